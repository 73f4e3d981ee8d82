//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Harvest configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  API Endpoint: {}", config.api.base_url);
        println!("  Page Size: {}", config.api.page_size);
        println!(
            "  API Token: {}",
            if config.api.api_token.is_some() {
                "set"
            } else {
                "not set"
            }
        );
        if !config.api.params.is_empty() {
            println!("  Extra Params: {:?}", config.api.params);
        }
        println!(
            "  Pages: {}..={} (stop after {} empty)",
            config.ingest.start_page, config.ingest.max_pages, config.ingest.empty_page_threshold
        );
        println!(
            "  Delays: {}ms between requests, {}ms backoff",
            config.ingest.request_delay_ms, config.ingest.backoff_delay_ms
        );
        println!("  Result File: {}", config.ingest.output_path.display());
        println!("  Export Directory: {}", config.export.base_dir.display());
        println!("  Export Concurrency: {}", config.export.max_concurrency);
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        let code = ValidateArgs {}
            .execute(&path.to_string_lossy())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_invalid_page_size_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("harvest.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://api.example.com/profiles\"\npage_size = 0\n",
        )
        .unwrap();

        let code = ValidateArgs {}
            .execute(&path.to_string_lossy())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
