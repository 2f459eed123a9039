//! Runtime validation of a loaded configuration.

use crate::schema::Config;
use tdash_common::{Result, TDashError};
use tracing_subscriber::EnvFilter;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        if config.data.path.as_os_str().is_empty() {
            return Err(TDashError::validation_field(
                "Dataset path cannot be empty",
                "data.path",
            ));
        }

        config.tz()?;

        if config.render.width == 0 || config.render.height == 0 {
            return Err(TDashError::validation_field(
                format!(
                    "Chart size must be non-zero, got {}x{}",
                    config.render.width, config.render.height
                ),
                "render",
            ));
        }

        if config.render.output_dir.as_os_str().is_empty() {
            return Err(TDashError::validation_field(
                "Output directory cannot be empty",
                "render.output_dir",
            ));
        }

        if EnvFilter::try_new(&config.logging.level).is_err() {
            return Err(TDashError::validation_field(
                format!("Invalid log level '{}'", config.logging.level),
                "logging.level",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unknown_timezone() {
        let mut config = Config::default();
        config.timezone = "Mars/Olympus_Mons".to_string();
        assert!(matches!(
            ConfigValidator::validate(&config),
            Err(TDashError::Timezone { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_size() {
        let mut config = Config::default();
        config.render.height = 0;
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(matches!(err, TDashError::Validation { field: Some(ref f), .. } if f == "render"));
    }

    #[test]
    fn test_rejects_empty_path() {
        let mut config = Config::default();
        config.data.path = "".into();
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_rejects_bad_log_level() {
        let mut config = Config::default();
        config.logging.level = "tdash=verbose".to_string();
        assert!(ConfigValidator::validate(&config).is_err());
    }
}
