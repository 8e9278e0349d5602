use clipvault_core::AppError;
use thiserror::Error;

/// Failures of the external remux and probe tools.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("{tool} could not be started: {source}")]
    ToolUnavailable {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        status: String,
        stderr: String,
    },

    #[error("Unexpected {tool} output: {message}")]
    InvalidOutput { tool: &'static str, message: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Failures while staging an upload to local disk.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("Upload exceeds the maximum size of {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("Failed to read upload body: {0}")]
    Body(String),

    #[error("Staging IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StageError> for AppError {
    fn from(err: StageError) -> Self {
        match err {
            StageError::TooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            StageError::Body(_) => AppError::InvalidInput(err.to_string()),
            StageError::Io(_) => AppError::Internal(err.to_string()),
        }
    }
}
