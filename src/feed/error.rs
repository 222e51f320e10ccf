use thiserror::Error;

use crate::error::ChartError;

/// Failures while fetching or decoding pricing data.
///
/// The chart surfaces every variant the same way (as a message in place of
/// the plot); the split exists for logging and tests.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    HttpStatus(u16),

    #[error("failed to process data: {0}")]
    Parse(String),

    #[error("invalid data format or empty response")]
    EmptyData,

    #[error(transparent)]
    Chart(#[from] ChartError),
}

pub type FeedResult<T> = Result<T, FeedError>;

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(feature = "http-client")]
impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::HttpStatus(status.as_u16())
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
