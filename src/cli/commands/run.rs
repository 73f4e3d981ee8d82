//! Run command implementation
//!
//! Fetch, save the result, then export the in-memory records without
//! re-reading the file.

use super::export::{export_exit_code, export_records};
use super::fetch::{error_exit_code, ingest, print_ingest_summary, FetchArgs};
use crate::config::load_config;
use crate::core::ingest::IngestOutcome;
use clap::Args;
use std::path::PathBuf;
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Root of the export tree (overrides export.base_dir)
    #[arg(short, long)]
    pub base_dir: Option<PathBuf>,

    /// Dry run mode - fetch, but write neither the result file nor the tree
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };
        self.fetch.apply(&mut config);
        if let Some(base_dir) = &self.base_dir {
            config.export.base_dir = base_dir.clone();
        }
        if self.dry_run {
            config.application.dry_run = true;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        println!("🚀 Fetching {}", config.api.base_url);
        println!();

        let fetched = match ingest(&config, shutdown_signal.clone()).await {
            Ok(f) => f,
            Err(e) => return Ok(error_exit_code(&e)),
        };
        print_ingest_summary(&fetched, &config);
        println!();

        let result = &fetched.result;
        match &result.outcome {
            IngestOutcome::Interrupted { .. } => {
                tracing::info!("Skipping export after interrupted fetch");
                return Ok(130);
            }
            IngestOutcome::Aborted { .. } if result.records.is_empty() => {
                return Ok(fetched.exit_code());
            }
            _ => {}
        }

        let dry_run = config.application.dry_run || config.export.dry_run;
        let summary =
            export_records(&config.export, dry_run, &result.records, shutdown_signal).await;

        let export_code = export_exit_code(&summary);
        Ok(if export_code != 0 {
            export_code
        } else {
            fetched.exit_code()
        })
    }
}
