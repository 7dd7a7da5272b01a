use std::path::PathBuf;

use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("LangSmith error: {0}")]
    LangSmith(#[from] LangSmithError),
}

/// Trace file errors
#[derive(Debug, Error)]
pub enum DataError {
    #[error("{} not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// LangSmith API errors
#[derive(Debug, Error)]
pub enum LangSmithError {
    #[error("LANGSMITH_API_KEY is not set")]
    MissingApiKey,

    #[error("LangSmith unavailable: {message} (retries: {retries})")]
    Unavailable { message: String, retries: u32 },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl LangSmithError {
    /// Whether another attempt at the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            LangSmithError::Api { status, .. } => {
                *status >= 500 || *status == 408 || *status == 429
            }
            LangSmithError::Timeout { .. } => true,
            LangSmithError::Http(e) => e.is_connect() || e.is_request(),
            LangSmithError::MissingApiKey
            | LangSmithError::Unavailable { .. }
            | LangSmithError::InvalidResponse { .. } => false,
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for trace file operations
pub type DataResult<T> = Result<T, DataError>;

/// Result type alias for LangSmith operations
pub type LangSmithResult<T> = Result<T, LangSmithError>;
