//! Error types for LinkHub.
//!
//! Uses thiserror for ergonomic error definitions. Gateway failures
//! carry the remote store's human-readable message; store operations
//! catch every variant at the call site and report through the
//! notification channel instead of propagating.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Remote entity gateway rejected or failed a call.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// URL refused by the safe-open check.
    #[error("Unsafe URL scheme: {0}")]
    UnsafeScheme(String),

    /// Entity not found in the current snapshot.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error (missing or malformed environment).
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

// Convenience conversions
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Gateway(format!("HTTP request failed: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Gateway(format!("Malformed gateway response: {}", err))
    }
}
