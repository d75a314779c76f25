//! Error types for dtr-prune

use thiserror::Error;

/// Main error type for pruning operations
#[derive(Error, Debug)]
pub enum PruneError {
    /// Missing or unreadable configuration or registry credentials
    #[error("Configuration error: {0}")]
    Config(String),

    /// Non-success HTTP status or network failure talking to the registry
    #[error("Transport error: {0}")]
    Transport(String),

    /// A `label-remainder` tag whose remainder does not match the datetime format
    #[error("Cannot parse timestamp in tag '{tag}' with format '{format}': {source}")]
    Parse {
        tag: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl From<reqwest::Error> for PruneError {
    fn from(e: reqwest::Error) -> Self {
        PruneError::Transport(e.to_string())
    }
}

/// Result type alias for pruning operations
pub type Result<T> = std::result::Result<T, PruneError>;
