use thiserror::Error;

/// Common error type for StakeSight components.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid amount '{input}': {reason}")]
    Amount { input: String, reason: String },
}

impl Error {
    /// Create an amount conversion error.
    pub fn amount(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Amount {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias using StakeSight's Error.
pub type Result<T> = std::result::Result<T, Error>;
