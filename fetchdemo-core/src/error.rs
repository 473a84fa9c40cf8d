use thiserror::Error;

/// Everything that can go wrong while turning a resource into JSON.
///
/// The controller flattens these into a display string before publishing, so
/// the `Display` text is what a user ends up reading.
#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS, connect, TLS or timeout failure.
    #[error("Network error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered outside the 2xx range.
    #[error("HTTP {code} {reason}")]
    Status { code: u16, reason: String },

    /// The body could not be read or was not valid JSON.
    #[error("Invalid JSON response: {0}")]
    Parse(String),

    #[error("Invalid request header '{name}'")]
    InvalidHeader { name: String },
}

impl FetchError {
    pub fn status(code: u16, reason: Option<&str>) -> Self {
        FetchError::Status {
            code,
            reason: reason.unwrap_or("Unknown Status").to_string(),
        }
    }
}
