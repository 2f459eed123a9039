//! Error types and utilities for tdash

use thiserror::Error;

/// Result type alias for tdash operations
pub type Result<T> = std::result::Result<T, TDashError>;

/// Main error type for tdash operations
#[derive(Error, Debug)]
pub enum TDashError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset reading and parsing errors
    #[error("Dataset error: {message}")]
    Dataset {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A task needs a column the loaded dataset does not carry
    #[error("Missing column '{column}' required by {task}")]
    MissingColumn { column: String, task: String },

    /// Unknown or unusable timezone names
    #[error("Timezone error: {message}")]
    Timezone { message: String, timezone: String },

    /// Graph generation and plotting errors
    #[error("Graph error: {message}")]
    Graph {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for configuration or input values
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl TDashError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new dataset error
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new dataset error with source
    pub fn dataset_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Dataset {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a missing column error for the named task
    pub fn missing_column(column: impl Into<String>, task: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
            task: task.into(),
        }
    }

    /// Create a new timezone error
    pub fn timezone(msg: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self::Timezone {
            message: msg.into(),
            timezone: timezone.into(),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Whether this error is a reported precondition failure rather than
    /// broken input or infrastructure
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::MissingColumn { .. })
    }
}

// Error conversion implementations for external types

/// Convert from csv::Error to TDashError
impl From<csv::Error> for TDashError {
    fn from(err: csv::Error) -> Self {
        let message = match err.position() {
            Some(pos) => format!("CSV parsing failed at line {}", pos.line()),
            None => "CSV parsing failed".to_string(),
        };
        Self::dataset_with_source(message, err)
    }
}

/// Convert from serde_yaml::Error to TDashError
impl From<serde_yaml::Error> for TDashError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config_with_source("YAML parsing error", err)
    }
}

/// Convert from toml::de::Error to TDashError
impl From<toml::de::Error> for TDashError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML parsing error", err)
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to TDashError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for TDashError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let error = TDashError::new("test message");
        assert!(error.to_string().contains("test message"));

        let config_error = TDashError::config("config issue");
        assert_eq!(config_error.to_string(), "Configuration error: config issue");

        let missing = TDashError::missing_column("url clicks", "Task 2: Clustered Bar");
        assert_eq!(
            missing.to_string(),
            "Missing column 'url clicks' required by Task 2: Clustered Bar"
        );
        assert!(missing.is_precondition());

        let validation_error = TDashError::validation_field("must not be empty", "data.path");
        assert!(validation_error.to_string().contains("Validation error"));
        assert!(!validation_error.is_precondition());

        let tz_error = TDashError::timezone("Unknown timezone", "Mars/Olympus");
        assert_eq!(tz_error.to_string(), "Timezone error: Unknown timezone");
    }

    #[test]
    fn test_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let wrapped_error = TDashError::dataset_with_source("Failed to open dataset", io_error);

        assert!(wrapped_error.to_string().contains("Failed to open dataset"));
        assert!(wrapped_error.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let tdash_error: TDashError = io_error.into();

        assert!(tdash_error.to_string().contains("I/O error"));
        assert!(tdash_error.source().is_some());
    }

    #[test]
    fn test_serde_error_conversion() {
        let serde_error = serde_json::from_str::<serde_json::Value>("{bad}").unwrap_err();
        let tdash_error: TDashError = serde_error.into();

        assert!(tdash_error.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<Vec<u32>>("{not: [a list").unwrap_err();
        let tdash_error: TDashError = yaml_error.into();

        assert!(matches!(tdash_error, TDashError::Config { .. }));
        assert!(tdash_error.source().is_some());
    }

    #[test]
    fn test_error_chain_preservation() {
        let root_error = io::Error::new(io::ErrorKind::NotFound, "Root cause");
        let middle_error = TDashError::config_with_source("Middle layer", root_error);
        let top_error = TDashError::with_source("Top layer", middle_error);

        let mut current_error: &dyn std::error::Error = &top_error;
        let mut error_count = 0;
        while let Some(source) = current_error.source() {
            current_error = source;
            error_count += 1;
        }

        assert_eq!(error_count, 2);
    }
}
