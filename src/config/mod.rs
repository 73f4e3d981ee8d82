//! Configuration management for Harvest.
//!
//! Harvest uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `HARVEST_<SECTION>_<KEY>` environment overrides
//! - Default values for every optional setting
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level, dry run
//! - [`ApiConfig`] - endpoint, page size, timeout, optional bearer token
//! - [`IngestConfig`] - page limits, delays, empty-page threshold, result file
//! - [`ExportConfig`] - base directory, input file, parallelism
//! - [`LoggingConfig`] - optional rolling JSON log file
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "https://server.example.uz/api/profiles"
//! page_size = 100
//! api_token = "${HARVEST_API_TOKEN}"
//!
//! [api.params]
//! region_id = "14"
//!
//! [ingest]
//! max_pages = 200
//! request_delay_ms = 800
//! backoff_delay_ms = 3000
//! empty_page_threshold = 3
//! output_path = "./result.json"
//!
//! [export]
//! base_dir = "./organizations"
//! input_path = "./result.json"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApiConfig, ApplicationConfig, ExportConfig, HarvestConfig, IngestConfig, LoggingConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
