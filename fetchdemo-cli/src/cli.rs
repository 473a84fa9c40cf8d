use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use fetchdemo_core::{
    Config, FetchController, FetchRequest, FetchState, LoaderDelay, Location, RequestConfig,
    location,
    posts::post_list_view,
    weather::{open_meteo_url, weather_view},
};
use inquire::Select;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::render;

/// Per-request ceiling; slower backends surface as a network error.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "fetchdemo", version, about = "Post list and current weather demo")]
pub struct Cli {
    /// More log output on stderr (-v, -vv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show one page of posts.
    Posts {
        /// Minimum loader time in ms (0, 500, 1000, 1500 or 2000).
        #[arg(long, value_parser = parse_delay)]
        delay: Option<LoaderDelay>,

        /// Override the posts endpoint.
        #[arg(long)]
        url: Option<String>,

        /// Page number, starting at 1.
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Show current weather for a location.
    Weather {
        /// Location key, see `fetchdemo locations`.
        #[arg(long)]
        location: Option<String>,

        /// Minimum loader time in ms (0, 500, 1000, 1500 or 2000).
        #[arg(long, value_parser = parse_delay)]
        delay: Option<LoaderDelay>,
    },

    /// Live weather view; type a location key to switch, `r` to refetch, `q` to quit.
    Watch {
        /// Location to start with.
        #[arg(long)]
        location: Option<String>,

        /// Minimum loader time in ms (0, 500, 1000, 1500 or 2000).
        #[arg(long, value_parser = parse_delay)]
        delay: Option<LoaderDelay>,
    },

    /// List the known locations.
    Locations,

    /// Pick a default loader time and location.
    Configure,
}

fn parse_delay(value: &str) -> Result<LoaderDelay, String> {
    LoaderDelay::try_from(value).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Posts { delay, url, page } => {
                let delay = resolve_delay(delay, &config)?;
                let url = url.unwrap_or_else(|| config.posts_url().to_string());
                let request = screen_request(url, delay);

                render::posts_header(delay.as_millis());
                let page = page.saturating_sub(1);
                fetch_and_render(request, |state| {
                    render::posts(&post_list_view(state, page));
                })
                .await?;
            }
            Command::Weather { location, delay } => {
                let delay = resolve_delay(delay, &config)?;
                let location = resolve_location(location.as_deref(), &config)?;
                let request = weather_request(&config, location, delay)?;

                render::weather_header(location, delay.as_millis());
                fetch_and_render(request, |state| render::weather(&weather_view(state))).await?;
            }
            Command::Watch { location, delay } => {
                let delay = resolve_delay(delay, &config)?;
                let location = resolve_location(location.as_deref(), &config)?;
                watch_weather(&config, location, delay).await?;
            }
            Command::Locations => {
                let default = config.default_location()?;
                render::locations(location::all(), default.key);
            }
            Command::Configure => configure(config)?,
        }

        Ok(())
    }
}

fn resolve_delay(flag: Option<LoaderDelay>, config: &Config) -> Result<LoaderDelay> {
    match flag {
        Some(delay) => Ok(delay),
        None => config.loader_delay(),
    }
}

fn resolve_location(flag: Option<&str>, config: &Config) -> Result<&'static Location> {
    match flag {
        Some(key) => location::find(key),
        None => config.default_location(),
    }
}

fn weather_request(
    config: &Config,
    location: &Location,
    delay: LoaderDelay,
) -> Result<FetchRequest> {
    let url = open_meteo_url(config.weather_base_url(), location)?;
    Ok(screen_request(url, delay))
}

fn screen_request(url: String, delay: LoaderDelay) -> FetchRequest {
    FetchRequest::new(url)
        .with_config(
            RequestConfig::default()
                .with_header("accept", "application/json")
                .with_timeout(REQUEST_TIMEOUT),
        )
        .with_min_display(delay.as_duration())
}

/// Run one request to completion, rendering the loading state and then the
/// settled one. An empty resource issues nothing and renders once.
async fn fetch_and_render(request: FetchRequest, show: impl Fn(&FetchState)) -> Result<()> {
    let mut controller = FetchController::default();
    let mut rx = controller.subscribe();

    let started = controller.observe(request);
    let loading = rx.borrow_and_update().clone();
    show(&loading);

    if !started {
        debug!("no request issued");
        controller.detach();
        return Ok(());
    }

    let settled = rx
        .wait_for(FetchState::is_settled)
        .await
        .context("Fetch controller stopped before the request settled")?
        .clone();

    println!();
    show(&settled);
    controller.detach();
    Ok(())
}

async fn watch_weather(config: &Config, start: &'static Location, delay: LoaderDelay) -> Result<()> {
    let mut controller = FetchController::default();
    let mut rx = controller.subscribe();
    let mut current = start;

    render::weather_header(current, delay.as_millis());
    println!("Type a location key to switch, `r` to refetch, `q` to quit.");
    println!();

    controller.observe(weather_request(config, current, delay)?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                let stamp = chrono::Local::now().format("%H:%M:%S%.3f");
                println!("[{stamp}] {}", current.name);
                render::weather(&weather_view(&state));
                println!();
            }
            line = lines.next_line() => {
                let Some(input) = line.context("Failed to read from stdin")? else {
                    break;
                };
                match input.trim() {
                    "" => {}
                    "q" | "quit" => break,
                    "r" | "refetch" => {
                        controller.refetch();
                    }
                    key => match location::find(key) {
                        Ok(next) => {
                            debug!(from = current.key, to = next.key, "switching location");
                            current = next;
                            controller.observe(weather_request(config, current, delay)?);
                        }
                        Err(err) => eprintln!("{err}"),
                    },
                }
            }
        }
    }

    controller.detach();
    Ok(())
}

fn configure(mut config: Config) -> Result<()> {
    let delays: Vec<LoaderDelay> = LoaderDelay::all().collect();
    let current_delay = config.loader_delay().unwrap_or_default();
    let delay_cursor = delays.iter().position(|d| *d == current_delay).unwrap_or(0);

    let delay = Select::new("Minimum loader time:", delays)
        .with_starting_cursor(delay_cursor)
        .prompt()
        .context("Loader time selection was cancelled")?;

    let places: Vec<Location> = location::all().to_vec();
    let current_key = config
        .default_location()
        .map(|loc| loc.key)
        .unwrap_or(location::DEFAULT_LOCATION_KEY);
    let place_cursor = places.iter().position(|l| l.key == current_key).unwrap_or(0);

    let place = Select::new("Default location:", places)
        .with_starting_cursor(place_cursor)
        .prompt()
        .context("Location selection was cancelled")?;

    config.set_loader_delay(delay);
    config.set_default_location(&place);
    let path = config.save()?;

    println!("Saved {} / {} to {}", delay, place.name, path.display());
    Ok(())
}
