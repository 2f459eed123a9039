//! Configuration loading with environment variable overrides.

use crate::schema::{Config, ImageFormat};
use std::env;
use std::path::Path;
use tdash_common::{Result, TDashError};
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "TDASH_CONFIG_PATH";

/// Files probed, in order, when no explicit path is given.
pub const DEFAULT_CONFIG_FILES: [&str; 3] = ["tdash.yaml", "tdash.yml", "tdash.toml"];

/// Serialized configuration formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML document.
    Yaml,
    /// TOML document.
    Toml,
}

impl ConfigFormat {
    /// Pick a format from a file extension; anything but `.toml` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from `TDASH_CONFIG_PATH`, a default file in the
    /// working directory, or built-in defaults, then apply env overrides
    /// and validate.
    pub fn load() -> Result<Config> {
        let mut config = if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            Self::read_file(Path::new(&path))?
        } else if let Some(path) = DEFAULT_CONFIG_FILES
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
        {
            Self::read_file(path)?
        } else {
            debug!("No configuration file found, using defaults");
            Config::default()
        };

        Self::apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file, then apply env overrides and validate.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let mut config = Self::read_file(path.as_ref())?;
        Self::apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration text in the given format without overrides.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Config> {
        let config = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Toml => toml::from_str(content)?,
        };
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TDashError::config_with_source(
                format!("Failed to read configuration file {}", path.display()),
                e,
            )
        })?;
        let config = Self::parse(&content, ConfigFormat::from_path(path))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
        if let Ok(path) = env::var("TDASH_DATA_PATH") {
            config.data.path = path.into();
        }

        if let Ok(timezone) = env::var("TDASH_TIMEZONE") {
            config.timezone = timezone;
        }

        if let Ok(dir) = env::var("TDASH_OUTPUT_DIR") {
            config.render.output_dir = dir.into();
        }

        if let Ok(format) = env::var("TDASH_OUTPUT_FORMAT") {
            config.render.format = match format.to_ascii_lowercase().as_str() {
                "png" => ImageFormat::Png,
                "svg" => ImageFormat::Svg,
                other => {
                    return Err(TDashError::validation_field(
                        format!("Unsupported output format '{other}'"),
                        "TDASH_OUTPUT_FORMAT",
                    ))
                }
            };
        }

        if let Ok(level) = env::var("TDASH_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(flag) = env::var("TDASH_SYNTHESIZE_MISSING") {
            config.data.synthesize_missing = flag.parse().map_err(|e| {
                TDashError::config_with_source(
                    "Failed to parse environment variable 'TDASH_SYNTHESIZE_MISSING'",
                    e,
                )
            })?;
        }

        Ok(())
    }
}
