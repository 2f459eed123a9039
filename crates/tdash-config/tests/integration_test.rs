//! Integration tests for tdash-config crate.

use std::io::Write;
use tdash_config::{Config, ConfigLoader, ImageFormat};

#[test]
fn test_default_config_validation() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.timezone = "Not/AZone".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_load_from_file_with_env_overrides() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        "data:\n  path: tweets.csv\nrender:\n  output_dir: out\n  format: svg\nlogging:\n  level: debug"
    )
    .unwrap();

    std::env::set_var("TDASH_TIMEZONE", "UTC");
    std::env::set_var("TDASH_SYNTHESIZE_MISSING", "true");
    let config = ConfigLoader::load_from_file(file.path()).unwrap();
    std::env::remove_var("TDASH_TIMEZONE");
    std::env::remove_var("TDASH_SYNTHESIZE_MISSING");

    assert_eq!(config.data.path.to_str(), Some("tweets.csv"));
    assert!(config.data.synthesize_missing);
    assert_eq!(config.timezone, "UTC");
    assert_eq!(config.render.format, ImageFormat::Svg);
    assert_eq!(config.render.output_dir.to_str(), Some("out"));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_load_missing_file_is_config_error() {
    let err = ConfigLoader::load_from_file("/definitely/not/here/tdash.yaml").unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
fn test_config_serializes_to_json() {
    let value = serde_json::to_value(Config::default()).unwrap();
    assert_eq!(value["timezone"], "Asia/Kolkata");
    assert_eq!(value["render"]["format"], "png");
}
