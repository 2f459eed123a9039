//! Structured logging infrastructure for tdash

use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, colourised output for terminals
    #[default]
    Pretty,
    /// Single-line output
    Compact,
    /// Newline-delimited JSON
    Json,
}

/// Configuration for the logging system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "tdash_graphs=trace")
    pub level: String,
    /// Line format
    pub format: LogFormat,
    /// Optional file path for log output
    pub file_path: Option<String>,
    /// Whether to include span open/close events
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file_path: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

/// Initialize the tracing subscriber with the given configuration
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_new(&config.level).or_else(|_| EnvFilter::try_new("info"))?;

    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let file = match &config.file_path {
        Some(path) => Some(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?,
        ),
        None => None,
    };

    match (config.format, file) {
        (LogFormat::Json, Some(file)) => {
            let layer = fmt::layer()
                .json()
                .with_span_events(span_events)
                .with_target(config.include_targets)
                .with_writer(file);
            registry.with(layer).try_init()?;
        }
        (LogFormat::Json, None) => {
            let layer = fmt::layer()
                .json()
                .with_span_events(span_events)
                .with_target(config.include_targets)
                .with_writer(std::io::stderr);
            registry.with(layer).try_init()?;
        }
        (LogFormat::Pretty, Some(file)) => {
            let layer = fmt::layer()
                .pretty()
                .with_ansi(false)
                .with_span_events(span_events)
                .with_target(config.include_targets)
                .with_writer(file);
            registry.with(layer).try_init()?;
        }
        (LogFormat::Pretty, None) => {
            let layer = fmt::layer()
                .pretty()
                .with_span_events(span_events)
                .with_target(config.include_targets)
                .with_writer(std::io::stderr);
            registry.with(layer).try_init()?;
        }
        (LogFormat::Compact, Some(file)) => {
            let layer = fmt::layer()
                .compact()
                .with_ansi(false)
                .with_span_events(span_events)
                .with_target(config.include_targets)
                .with_writer(file);
            registry.with(layer).try_init()?;
        }
        (LogFormat::Compact, None) => {
            let layer = fmt::layer()
                .compact()
                .with_span_events(span_events)
                .with_target(config.include_targets)
                .with_writer(std::io::stderr);
            registry.with(layer).try_init()?;
        }
    }

    Ok(())
}
