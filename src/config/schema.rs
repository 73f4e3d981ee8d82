//! Configuration schema types
//!
//! This module defines the configuration structure that maps to `harvest.toml`.

use crate::config::SecretString;
use crate::core::ingest::IngestSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Main Harvest configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HarvestConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Remote API settings
    pub api: ApiConfig,

    /// Pagination loop settings
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Hierarchical export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HarvestConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.api.validate()?;
        self.ingest.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (compute export targets without touching the filesystem)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Remote paginated API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Endpoint returning a JSON array of records per page
    pub base_url: String,

    /// Records requested per page (`limit` query parameter)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Optional bearer token
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_token: Option<SecretString>,

    /// User-Agent header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Static query parameters added to every request (e.g. `region_id`)
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl ApiConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.is_empty() {
            return Err("api.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("api.base_url must start with http:// or https://".to_string());
        }

        if url::Url::parse(&self.base_url).is_err() {
            return Err(format!("api.base_url is not a valid URL: {}", self.base_url));
        }

        if !(1..=1000).contains(&self.page_size) {
            return Err(format!(
                "api.page_size must be between 1 and 1000, got {}",
                self.page_size
            ));
        }

        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be > 0".to_string());
        }

        if let Some(token) = &self.api_token {
            if token.expose_secret().is_empty() {
                return Err("api.api_token cannot be empty when set".to_string());
            }
        }

        for reserved in ["page", "limit"] {
            if self.params.contains_key(reserved) {
                return Err(format!(
                    "api.params cannot override the '{reserved}' pagination parameter"
                ));
            }
        }

        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/profiles".to_string(),
            page_size: default_page_size(),
            timeout_seconds: default_timeout_seconds(),
            api_token: None,
            user_agent: default_user_agent(),
            params: BTreeMap::new(),
        }
    }
}

/// Pagination loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// First page index requested
    #[serde(default = "default_start_page")]
    pub start_page: u32,

    /// Safety bound: pages beyond this index are never requested
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Delay between consecutive requests in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Delay after a transient server error in milliseconds
    #[serde(default = "default_backoff_delay_ms")]
    pub backoff_delay_ms: u64,

    /// Consecutive empty pages that end the run
    #[serde(default = "default_empty_page_threshold")]
    pub empty_page_threshold: u32,

    /// Where the ingestion result (JSON array) is written
    #[serde(default = "default_result_path")]
    pub output_path: PathBuf,
}

impl IngestConfig {
    fn validate(&self) -> Result<(), String> {
        if self.start_page == 0 {
            return Err("ingest.start_page must be >= 1".to_string());
        }

        if self.max_pages < self.start_page {
            return Err(format!(
                "ingest.max_pages ({}) must be >= ingest.start_page ({})",
                self.max_pages, self.start_page
            ));
        }

        if self.empty_page_threshold == 0 {
            return Err("ingest.empty_page_threshold must be >= 1".to_string());
        }

        if self.output_path.as_os_str().is_empty() {
            return Err("ingest.output_path cannot be empty".to_string());
        }

        Ok(())
    }

    /// Runtime settings consumed by the ingestion loop
    pub fn settings(&self, page_size: u32) -> IngestSettings {
        IngestSettings {
            page_size,
            start_page: self.start_page,
            max_pages: self.max_pages,
            request_delay: Duration::from_millis(self.request_delay_ms),
            backoff_delay: Duration::from_millis(self.backoff_delay_ms),
            empty_page_threshold: self.empty_page_threshold,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            start_page: default_start_page(),
            max_pages: default_max_pages(),
            request_delay_ms: default_request_delay_ms(),
            backoff_delay_ms: default_backoff_delay_ms(),
            empty_page_threshold: default_empty_page_threshold(),
            output_path: default_result_path(),
        }
    }
}

/// Hierarchical export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Root of the `<region>/<organization>/<person>` tree
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Ingestion result file read by the `export` command
    #[serde(default = "default_result_path")]
    pub input_path: PathBuf,

    /// Records exported in parallel
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Compute targets and file sets without writing anything
    #[serde(default)]
    pub dry_run: bool,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_dir.as_os_str().is_empty() {
            return Err("export.base_dir cannot be empty".to_string());
        }

        if self.max_concurrency == 0 || self.max_concurrency > 64 {
            return Err(format!(
                "export.max_concurrency must be between 1 and 64, got {}",
                self.max_concurrency
            ));
        }

        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            input_path: default_result_path(),
            max_concurrency: default_max_concurrency(),
            dry_run: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily or hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when file logging is enabled".into());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("harvest/{}", env!("CARGO_PKG_VERSION"))
}

fn default_start_page() -> u32 {
    1
}

fn default_max_pages() -> u32 {
    200
}

fn default_request_delay_ms() -> u64 {
    800
}

fn default_backoff_delay_ms() -> u64 {
    3000
}

fn default_empty_page_threshold() -> u32 {
    3
}

fn default_result_path() -> PathBuf {
    PathBuf::from("./result.json")
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("./organizations")
}

fn default_max_concurrency() -> usize {
    4
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_config_validation() {
        let mut config = ApiConfig::default();
        assert!(config.validate().is_ok());

        config.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.base_url = "https://example.com/api/profiles".to_string();
        config.page_size = 0;
        assert!(config.validate().is_err());

        config.page_size = 100;
        config.api_token = Some(secret_string(String::new()));
        assert!(config.validate().is_err());

        config.api_token = Some(secret_string("token".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_params_cannot_shadow_pagination() {
        let mut config = ApiConfig::default();
        config.params.insert("region_id".to_string(), "14".to_string());
        assert!(config.validate().is_ok());

        config.params.insert("page".to_string(), "3".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.contains("page"));
    }

    #[test]
    fn test_ingest_config_defaults() {
        let config = IngestConfig::default();
        assert_eq!(config.start_page, 1);
        assert_eq!(config.max_pages, 200);
        assert_eq!(config.request_delay_ms, 800);
        assert_eq!(config.backoff_delay_ms, 3000);
        assert_eq!(config.empty_page_threshold, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ingest_config_validation() {
        let mut config = IngestConfig::default();

        config.empty_page_threshold = 0;
        assert!(config.validate().is_err());

        config.empty_page_threshold = 3;
        config.start_page = 10;
        config.max_pages = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ingest_settings_conversion() {
        let config = IngestConfig::default();
        let settings = config.settings(50);
        assert_eq!(settings.page_size, 50);
        assert_eq!(settings.request_delay, Duration::from_millis(800));
        assert_eq!(settings.backoff_delay, Duration::from_millis(3000));
    }

    #[test]
    fn test_export_config_validation() {
        let mut config = ExportConfig::default();
        assert!(config.validate().is_ok());

        config.max_concurrency = 0;
        assert!(config.validate().is_err());

        config.max_concurrency = 65;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }
}
