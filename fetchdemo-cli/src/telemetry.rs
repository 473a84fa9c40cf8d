use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. `-v` flags win over `RUST_LOG`; without
/// either only warnings reach stderr.
pub fn init(verbosity: u8) {
    let env_filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info,fetchdemo_core=debug"),
        _ => EnvFilter::new("debug,fetchdemo_core=trace"),
    };

    let stderr = fmt::layer().with_writer(std::io::stderr).with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr)
        .init();
}
