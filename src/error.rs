use std::time::Duration;
use thiserror::Error;

/// Failure of a single page fetch.
///
/// These never abort a scan. The discoverer and the content pool log them and
/// carry on with whatever else they have.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("Fetch failed: {0}")]
    Other(String),
}

/// Errors surfaced to the caller of a scan.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid seed URL: {0}")]
    InvalidSeedUrl(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("scan was cancelled")]
    Cancelled,

    #[error("scan did not finish within {0:?}")]
    TimedOut(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not set up the HTTP client: {0}")]
    ClientSetup(#[source] FetchError),
}

pub type Result<T> = std::result::Result<T, ScanError>;
