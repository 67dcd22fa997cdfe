//! Error types for loading and presenting the feed.

use thiserror::Error;

/// Errors that can occur while loading the feed or preparing its articles.
///
/// None of these stop the program on their own: fetch errors end in the
/// fallback dataset and link errors end in a notice next to the article.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Feed endpoint answered with a non-success status
    #[error("Feed returned HTTP status {status}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
    },

    /// Local feed file could not be read
    #[error("Failed to read feed file {path}: {message}")]
    FileRead {
        /// Path that was read
        path: String,
        /// Underlying I/O error
        message: String,
    },

    /// Neither a feed URL nor a feed file was given
    #[error("No feed source configured")]
    NotConfigured,

    /// Article link is empty, relative, or not http(s)
    #[error("Invalid article link {0:?}")]
    InvalidLink(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FeedError::HttpStatus {
                status: status.as_u16(),
            },
            None => FeedError::RequestFailed(e.to_string()),
        }
    }
}
