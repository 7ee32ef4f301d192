// Unit tests for config defaults and validation
// Load/save round-trips are in integration territory but cheap enough to
// keep here with a temp directory.

use crate::config::ClientConfig;
use crate::error::config::ConfigError;

#[test]
fn given_defaults_when_validated_then_config_is_valid() {
    let config = ClientConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.api.base_url, crate::DEFAULT_API_BASE_URL);
    assert_eq!(config.api.collection, crate::SOCIAL_COLLECTION);
    assert_eq!(config.search.page_size, crate::posts::PAGE_SIZE);
    assert_eq!(config.search.debounce_ms, 300);
}

#[test]
fn given_invalid_values_when_validated_then_each_is_rejected() {
    let mut config = ClientConfig::default();
    config.api.base_url = String::from("not a url");
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));

    let mut config = ClientConfig::default();
    config.api.base_url = String::from("ftp://example.com");
    assert!(config.validate().is_err(), "non-http scheme rejected");

    let mut config = ClientConfig::default();
    config.api.collection = String::from("social/extra");
    assert!(config.validate().is_err(), "path separators rejected");

    let mut config = ClientConfig::default();
    config.search.page_size = 0;
    assert!(config.validate().is_err());

    let mut config = ClientConfig::default();
    config.search.debounce_ms = 60_000;
    assert!(config.validate().is_err());

    let mut config = ClientConfig::default();
    config.version = 0;
    assert!(config.validate().is_err());
}

/// **VALUE**: Verifies a partial config file deserializes with defaults
/// filled in.
///
/// **WHY THIS MATTERS**: Users hand-edit only the fields they care about;
/// a config carrying just a base URL must not lose the search tuning.
///
/// **BUG THIS CATCHES**: Would catch a missing `#[serde(default)]` on a
/// section or field.
#[test]
fn given_partial_json_when_parsed_then_missing_fields_default() {
    let config: ClientConfig =
        serde_json::from_str(r#"{ "api": { "base_url": "https://example.com" } }"#)
            .expect("partial config should parse");

    assert_eq!(config.api.base_url, "https://example.com");
    assert_eq!(config.api.collection, crate::SOCIAL_COLLECTION);
    assert_eq!(config.search.page_size, crate::posts::PAGE_SIZE);
    assert_eq!(config.version, 1);
}

#[test]
fn given_search_config_when_converted_then_debounce_is_a_duration() {
    let mut config = ClientConfig::default();
    config.search.debounce_ms = 150;
    assert_eq!(
        config.search.debounce(),
        std::time::Duration::from_millis(150)
    );
}

#[test]
fn given_saved_config_when_loaded_then_round_trips() {
    let dir = tempfile::tempdir().expect("temp dir");

    let mut config = ClientConfig::default();
    config.search.page_size = 25;
    config.save(dir.path()).expect("save should succeed");

    let loaded = ClientConfig::load(dir.path()).expect("load should succeed");
    assert_eq!(loaded.search.page_size, 25);
    assert_eq!(loaded.api.base_url, config.api.base_url);
}

#[test]
fn given_missing_file_when_loaded_then_defaults_returned() {
    let dir = tempfile::tempdir().expect("temp dir");
    let loaded = ClientConfig::load(dir.path()).expect("missing file is not an error");
    assert_eq!(loaded.search.debounce_ms, 300);
}

#[test]
fn given_corrupt_file_when_loaded_then_parse_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("config.json"), "{ not json").expect("write");

    assert!(matches!(
        ClientConfig::load(dir.path()),
        Err(ConfigError::ParseError { .. })
    ));
}
