//! Fetch command implementation
//!
//! Pages through the configured endpoint and saves the deduplicated result
//! as a JSON array.

use crate::adapters::api::HttpPageFetcher;
use crate::config::{load_config, HarvestConfig};
use crate::core::ingest::{write_snapshot, IngestOutcome, IngestionLoop, IngestionResult};
use crate::domain::{HarvestError, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::sync::watch;

/// Arguments for the fetch command
#[derive(Args, Debug, Default, Clone)]
pub struct FetchArgs {
    /// Where to save the result (overrides ingest.output_path)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// First page to request (overrides ingest.start_page)
    #[arg(long)]
    pub start_page: Option<u32>,

    /// Safety page limit (overrides ingest.max_pages)
    #[arg(long)]
    pub max_pages: Option<u32>,
}

impl FetchArgs {
    /// Apply CLI overrides to a loaded configuration
    pub fn apply(&self, config: &mut HarvestConfig) {
        if let Some(output) = &self.output {
            tracing::info!(output = %output.display(), "Overriding output path from CLI");
            config.ingest.output_path = output.clone();
        }
        if let Some(start_page) = self.start_page {
            config.ingest.start_page = start_page;
        }
        if let Some(max_pages) = self.max_pages {
            config.ingest.max_pages = max_pages;
        }
    }

    /// Execute the fetch command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting fetch command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };
        self.apply(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        println!("🚀 Fetching {}", config.api.base_url);
        println!();

        let fetched = match ingest(&config, shutdown_signal).await {
            Ok(f) => f,
            Err(e) => return Ok(error_exit_code(&e)),
        };

        print_ingest_summary(&fetched, &config);
        Ok(fetched.exit_code())
    }
}

/// Records from one ingestion run, plus the error if they could not be saved
#[derive(Debug)]
pub struct Fetched {
    pub result: IngestionResult,
    pub snapshot_error: Option<HarvestError>,
}

impl Fetched {
    /// Exit code for the ingestion outcome; an unsaved result is a partial failure
    pub fn exit_code(&self) -> i32 {
        match (ingest_exit_code(&self.result), &self.snapshot_error) {
            (0, Some(_)) => 1,
            (code, _) => code,
        }
    }
}

/// Run the ingestion loop against the configured API and save its result
///
/// The result is saved whatever the outcome, except in dry-run mode. Failing
/// to save does not discard the records.
pub async fn ingest(
    config: &HarvestConfig,
    shutdown_signal: watch::Receiver<bool>,
) -> Result<Fetched> {
    let fetcher = HttpPageFetcher::new(config.api.clone()).map_err(|e| {
        tracing::error!(error = %e, "Failed to create API client");
        eprintln!("Failed to initialize API client: {e}");
        e
    })?;

    let settings = config.ingest.settings(config.api.page_size);
    let result = IngestionLoop::new(&fetcher, settings)
        .with_shutdown(shutdown_signal)
        .run()
        .await;

    let mut snapshot_error = None;
    if config.application.dry_run {
        tracing::info!(
            path = %config.ingest.output_path.display(),
            records = result.records.len(),
            "[dry-run] would write snapshot"
        );
    } else if let Err(e) = write_snapshot(&config.ingest.output_path, &result.records).await {
        tracing::error!(
            error = %e,
            records = result.records.len(),
            "Failed to save ingestion result"
        );
        snapshot_error = Some(e);
    }

    Ok(Fetched {
        result,
        snapshot_error,
    })
}

/// Print the ingestion summary
pub fn print_ingest_summary(fetched: &Fetched, config: &HarvestConfig) {
    let result = &fetched.result;
    let summary = &result.summary;
    println!("📊 Fetch Summary:");
    println!("  Outcome: {}", result.outcome.label());
    println!("  Pages Fetched: {}", summary.pages_fetched);
    println!("  Last Page: {}", summary.last_page);
    println!("  Records Seen: {}", summary.records_seen);
    println!("  Unique Records: {}", result.records.len());
    println!("  Duplicates Skipped: {}", summary.duplicates_skipped);
    println!("  Unidentifiable Skipped: {}", summary.unidentifiable_skipped);
    println!("  Transient Errors: {}", summary.transient_errors);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    match &fetched.snapshot_error {
        Some(e) => println!("  Not Saved: {e}"),
        None if !config.application.dry_run => {
            println!("  Saved To: {}", config.ingest.output_path.display());
        }
        None => {}
    }
    println!();

    match &result.outcome {
        IngestOutcome::Done(_) => println!("✅ Fetch completed"),
        IngestOutcome::Aborted { page, error } => {
            println!("⚠️  Fetch stopped at page {page}: {error}");
            println!("   Records collected before the failure were kept.");
        }
        IngestOutcome::Interrupted { page } => {
            println!("⚠️  Fetch interrupted before page {page}. Collected records were kept.");
        }
    }
}

/// Exit code for an ingestion outcome
pub fn ingest_exit_code(result: &IngestionResult) -> i32 {
    match &result.outcome {
        IngestOutcome::Done(_) => 0,
        IngestOutcome::Interrupted { .. } => 130,
        IngestOutcome::Aborted { .. } if result.records.is_empty() => 4,
        IngestOutcome::Aborted { .. } => 1,
    }
}

/// Exit code for an error that prevented the command from finishing
pub fn error_exit_code(error: &HarvestError) -> i32 {
    match error {
        HarvestError::Configuration(_) => 2,
        HarvestError::Fetch(_) => 4,
        _ => 5,
    }
}
