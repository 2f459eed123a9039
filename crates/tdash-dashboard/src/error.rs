//! Errors raised by the command line front end.

use tdash_common::TDashError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Configuration, dataset or chart error from the library crates.
    #[error(transparent)]
    Dashboard(#[from] TDashError),

    /// A `--task` number that names no tab.
    #[error("Unknown task number {0}; expected 1 to 6")]
    UnknownTask(u8),

    /// The logging subscriber could not be installed.
    #[error("Failed to initialise logging: {0}")]
    Logging(String),

    /// Writing the report failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON report encoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for the command line front end.
pub type AppResult<T> = Result<T, AppError>;
