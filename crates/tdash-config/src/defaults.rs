//! Default values for every configuration section.

use crate::schema::*;
use tdash_common::LoggingConfig;

/// Timezone used when none is configured (Indian Standard Time).
pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";

/// Dataset path used when none is configured.
pub const DEFAULT_DATA_PATH: &str = "SocialMedia.csv";

/// Directory charts are written to by default.
pub const DEFAULT_OUTPUT_DIR: &str = "charts";

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            render: RenderConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DATA_PATH.into(),
            synthesize_missing: false,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: DEFAULT_OUTPUT_DIR.into(),
            format: ImageFormat::Png,
            width: 1000,
            height: 600,
        }
    }
}
