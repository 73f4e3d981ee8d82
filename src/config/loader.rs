//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::HarvestConfig;
use super::secret_string;
use crate::domain::errors::HarvestError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into HarvestConfig
/// 4. Applies environment variable overrides (HARVEST_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a `Configuration` error if the file is missing or unreadable, the
/// TOML is malformed, a referenced variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use harvest::config::loader::load_config;
///
/// let config = load_config("harvest.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<HarvestConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(HarvestError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        HarvestError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: HarvestConfig = toml::from_str(&contents)
        .map_err(|e| HarvestError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        HarvestError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| HarvestError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(HarvestError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the HARVEST_* prefix
///
/// Variables follow the pattern `HARVEST_<SECTION>_<KEY>`, for example
/// `HARVEST_API_BASE_URL` or `HARVEST_INGEST_MAX_PAGES`. Values that fail to
/// parse are ignored and the file value is kept.
fn apply_env_overrides(config: &mut HarvestConfig) {
    fn var(name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
        var(name).and_then(|v| v.parse().ok())
    }

    // Application
    if let Some(val) = var("HARVEST_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = parsed("HARVEST_APPLICATION_DRY_RUN") {
        config.application.dry_run = val;
    }

    // API
    if let Some(val) = var("HARVEST_API_BASE_URL") {
        config.api.base_url = val;
    }
    if let Some(val) = parsed("HARVEST_API_PAGE_SIZE") {
        config.api.page_size = val;
    }
    if let Some(val) = parsed("HARVEST_API_TIMEOUT_SECONDS") {
        config.api.timeout_seconds = val;
    }
    if let Some(val) = var("HARVEST_API_TOKEN") {
        config.api.api_token = Some(secret_string(val));
    }

    // Ingest
    if let Some(val) = parsed("HARVEST_INGEST_START_PAGE") {
        config.ingest.start_page = val;
    }
    if let Some(val) = parsed("HARVEST_INGEST_MAX_PAGES") {
        config.ingest.max_pages = val;
    }
    if let Some(val) = parsed("HARVEST_INGEST_REQUEST_DELAY_MS") {
        config.ingest.request_delay_ms = val;
    }
    if let Some(val) = parsed("HARVEST_INGEST_BACKOFF_DELAY_MS") {
        config.ingest.backoff_delay_ms = val;
    }
    if let Some(val) = parsed("HARVEST_INGEST_EMPTY_PAGE_THRESHOLD") {
        config.ingest.empty_page_threshold = val;
    }
    if let Some(val) = var("HARVEST_INGEST_OUTPUT_PATH") {
        config.ingest.output_path = PathBuf::from(val);
    }

    // Export
    if let Some(val) = var("HARVEST_EXPORT_BASE_DIR") {
        config.export.base_dir = PathBuf::from(val);
    }
    if let Some(val) = var("HARVEST_EXPORT_INPUT_PATH") {
        config.export.input_path = PathBuf::from(val);
    }
    if let Some(val) = parsed("HARVEST_EXPORT_MAX_CONCURRENCY") {
        config.export.max_concurrency = val;
    }
    if let Some(val) = parsed("HARVEST_EXPORT_DRY_RUN") {
        config.export.dry_run = val;
    }

    // Logging
    if let Some(val) = parsed("HARVEST_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val;
    }
    if let Some(val) = var("HARVEST_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
