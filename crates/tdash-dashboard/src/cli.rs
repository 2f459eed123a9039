//! Command line arguments.

use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use clap::Parser;
use std::path::PathBuf;
use tdash_config::{Config, ConfigLoader};
use tdash_graphs::TaskId;

/// Command line arguments
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path (YAML or TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level, overriding the configuration file
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Run only this tab (1-6); repeat for several. Defaults to all tabs
    #[arg(short, long = "task", value_name = "N", value_parser = clap::value_parser!(u8).range(1..=6))]
    pub tasks: Vec<u8>,

    /// Evaluate render windows at this RFC 3339 instant instead of now
    #[arg(long, value_name = "RFC3339", value_parser = parse_instant)]
    pub at: Option<DateTime<Utc>>,

    /// Directory charts are written into, overriding the configuration file
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Print reports as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// How reports are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

/// What to run, independent of configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub tasks: Vec<TaskId>,
    pub at: Option<DateTime<Utc>>,
    pub output: OutputMode,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            tasks: TaskId::ALL.to_vec(),
            at: None,
            output: OutputMode::Text,
        }
    }
}

impl Args {
    /// Load the configuration file and apply command line overrides.
    pub fn resolve_config(&self) -> AppResult<Config> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };

        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.render.output_dir = dir.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Selected tabs in the order given, duplicates dropped.
    pub fn task_ids(&self) -> AppResult<Vec<TaskId>> {
        if self.tasks.is_empty() {
            return Ok(TaskId::ALL.to_vec());
        }

        let mut ids = Vec::with_capacity(self.tasks.len());
        for &number in &self.tasks {
            let id = TaskId::from_number(number).ok_or(AppError::UnknownTask(number))?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    pub fn run_options(&self) -> AppResult<RunOptions> {
        Ok(RunOptions {
            tasks: self.task_ids()?,
            at: self.at,
            output: if self.json {
                OutputMode::Json
            } else {
                OutputMode::Text
            },
        })
    }
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp such as 2024-06-05T16:30:00+05:30: {e}"))
}
