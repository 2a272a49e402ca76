use thiserror::Error;

/// Application-wide error types.
///
/// `Clone` is required because the read cache hands the same failure to
/// every caller waiting on a shared fetch.
#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// The primary store could not be reached or answered with a non-success status.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Both the primary store and the fallback snapshot failed.
    #[error("Data unavailable: {0}")]
    FallbackUnavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Helper conversion from anyhow::Error
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}
