//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables should be run with --test-threads=1
//! to avoid interference between tests.

use harvest::config::load_config;
use harvest::domain::HarvestError;
use secrecy::ExposeSecret;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    for name in [
        "HARVEST_APPLICATION_LOG_LEVEL",
        "HARVEST_API_BASE_URL",
        "HARVEST_API_PAGE_SIZE",
        "HARVEST_API_TOKEN",
        "HARVEST_INGEST_MAX_PAGES",
        "HARVEST_INGEST_REQUEST_DELAY_MS",
        "HARVEST_EXPORT_BASE_DIR",
        "HARVEST_EXPORT_MAX_CONCURRENCY",
        "TEST_HARVEST_TOKEN",
    ] {
        std::env::remove_var(name);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

const COMPLETE: &str = r#"
[application]
log_level = "debug"
dry_run = true

[api]
base_url = "https://server.example.uz/api/profiles"
page_size = 50
timeout_seconds = 10
user_agent = "harvest-test"

[api.params]
region_id = "14"

[ingest]
start_page = 2
max_pages = 20
request_delay_ms = 100
backoff_delay_ms = 500
empty_page_threshold = 5
output_path = "/tmp/harvest/result.json"

[export]
base_dir = "/tmp/harvest/organizations"
input_path = "/tmp/harvest/result.json"
max_concurrency = 8
dry_run = true

[logging]
local_enabled = false
local_path = "/tmp/harvest/logs"
local_rotation = "hourly"
"#;

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(COMPLETE);
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);
    assert_eq!(config.api.page_size, 50);
    assert_eq!(config.api.params.get("region_id").map(String::as_str), Some("14"));
    assert!(config.api.api_token.is_none());
    assert_eq!(config.ingest.start_page, 2);
    assert_eq!(config.export.max_concurrency, 8);
    assert_eq!(config.logging.local_rotation, "hourly");

    let settings = config.ingest.settings(config.api.page_size);
    assert_eq!(settings.page_size, 50);
    assert_eq!(settings.max_pages, 20);
    assert_eq!(settings.request_delay, Duration::from_millis(100));
    assert_eq!(settings.backoff_delay, Duration::from_millis(500));
    assert_eq!(settings.empty_page_threshold, 5);
}

#[test]
fn test_env_overrides_take_precedence() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("HARVEST_API_PAGE_SIZE", "25");
    std::env::set_var("HARVEST_INGEST_MAX_PAGES", "3");
    std::env::set_var("HARVEST_EXPORT_BASE_DIR", "/data/out");
    std::env::set_var("HARVEST_API_TOKEN", "from-env");

    let file = write_config(COMPLETE);
    let result = load_config(file.path());
    cleanup_env_vars();
    let config = result.unwrap();

    assert_eq!(config.api.page_size, 25);
    assert_eq!(config.ingest.max_pages, 3);
    assert_eq!(config.export.base_dir, PathBuf::from("/data/out"));
    let token = config.api.api_token.unwrap();
    assert_eq!(token.expose_secret().as_ref(), "from-env");
}

#[test]
fn test_unparsable_override_keeps_file_value() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("HARVEST_INGEST_REQUEST_DELAY_MS", "soon");
    let file = write_config(COMPLETE);
    let result = load_config(file.path());
    cleanup_env_vars();

    assert_eq!(result.unwrap().ingest.request_delay_ms, 100);
}

#[test]
fn test_token_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("TEST_HARVEST_TOKEN", "substituted");
    let file = write_config(
        r#"
[api]
base_url = "https://server.example.uz/api/profiles"
api_token = "${TEST_HARVEST_TOKEN}"
"#,
    );
    let result = load_config(file.path());
    cleanup_env_vars();

    let token = result.unwrap().api.api_token.unwrap();
    assert_eq!(token.expose_secret().as_ref(), "substituted");
}

#[test]
fn test_missing_substitution_variable_is_configuration_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[api]
base_url = "https://server.example.uz/api/profiles"
api_token = "${TEST_HARVEST_TOKEN}"
"#,
    );

    match load_config(file.path()) {
        Err(HarvestError::Configuration(msg)) => assert!(msg.contains("TEST_HARVEST_TOKEN")),
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_invalid_values_are_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    for (content, needle) in [
        (
            "[api]\nbase_url = \"ftp://server.example.uz\"\n",
            "http",
        ),
        (
            "[api]\nbase_url = \"https://x.uz\"\n[ingest]\nempty_page_threshold = 0\n",
            "empty_page_threshold",
        ),
        (
            "[api]\nbase_url = \"https://x.uz\"\n[export]\nmax_concurrency = 0\n",
            "max_concurrency",
        ),
        (
            "[api]\nbase_url = \"https://x.uz\"\n[api.params]\nlimit = \"5\"\n",
            "limit",
        ),
    ] {
        let file = write_config(content);
        let err = load_config(file.path()).unwrap_err();
        assert!(
            err.to_string().contains(needle),
            "{err} should mention {needle}"
        );
    }
}

#[test]
fn test_malformed_toml_is_configuration_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[api\nbase_url = ");
    assert!(matches!(
        load_config(file.path()),
        Err(HarvestError::Configuration(_))
    ));
}
