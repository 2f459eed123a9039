//! Configuration schema definitions using serde.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tdash_common::{LoggingConfig, Result, TDashError};

/// Main configuration structure for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset source configuration.
    pub data: DataConfig,
    /// IANA timezone used by every time gate and timezone-converting task.
    pub timezone: String,
    /// Chart output configuration.
    pub render: RenderConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Dataset source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path of the CSV export.
    pub path: PathBuf,
    /// Fill absent demo columns with synthetic values instead of failing.
    pub synthesize_missing: bool,
}

/// Image formats the renderer can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Raster PNG.
    Png,
    /// Vector SVG.
    Svg,
}

impl ImageFormat {
    /// File extension for this format.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

/// Chart output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Directory charts are written into.
    pub output_dir: PathBuf,
    /// Output image format.
    pub format: ImageFormat,
    /// Chart width in pixels.
    pub width: u32,
    /// Chart height in pixels.
    pub height: u32,
}

impl Config {
    /// Resolve the configured timezone.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| TDashError::timezone("Unknown IANA timezone", self.timezone.clone()))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        crate::validator::ConfigValidator::validate(self)
    }
}
