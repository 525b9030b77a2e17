//! Feed client error types.

use super::scan::ScanError;

/// Errors that can occur when fetching departures from the feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed returned an error status
    #[error("feed API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be scanned into departures
    #[error(transparent)]
    Scan(#[from] ScanError),
}
