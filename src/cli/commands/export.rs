//! Export command implementation
//!
//! Reads a saved ingestion result and writes the
//! `<base>/<region>/<organization>/<person>/` tree.

use crate::adapters::filesystem::{DryRunSink, FileSink, LocalFileSink};
use crate::config::{load_config, ExportConfig, HarvestConfig};
use crate::core::export::{ExportEngine, ExportSummary};
use crate::core::ingest::read_snapshot;
use crate::domain::Record;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug, Default, Clone)]
pub struct ExportArgs {
    /// Saved result to export (overrides export.input_path)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Root of the export tree (overrides export.base_dir)
    #[arg(short, long)]
    pub base_dir: Option<PathBuf>,

    /// Records exported in parallel (overrides export.max_concurrency)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Dry run mode - compute targets and files without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl ExportArgs {
    /// Apply CLI overrides to a loaded configuration
    pub fn apply(&self, config: &mut HarvestConfig) {
        if let Some(input) = &self.input {
            config.export.input_path = input.clone();
        }
        if let Some(base_dir) = &self.base_dir {
            tracing::info!(base_dir = %base_dir.display(), "Overriding base directory from CLI");
            config.export.base_dir = base_dir.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.export.max_concurrency = concurrency;
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.export.dry_run = true;
        }
    }

    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

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

        let records = match read_snapshot(&config.export.input_path).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load ingestion result");
                eprintln!("Failed to load {}: {e}", config.export.input_path.display());
                return Ok(5);
            }
        };

        let dry_run = config.application.dry_run || config.export.dry_run;
        let summary = export_records(&config.export, dry_run, &records, shutdown_signal).await;
        Ok(export_exit_code(&summary))
    }
}

/// Export `records` with the configured engine and print the summary
pub async fn export_records(
    config: &ExportConfig,
    dry_run: bool,
    records: &[Record],
    shutdown_signal: watch::Receiver<bool>,
) -> ExportSummary {
    let sink: Arc<dyn FileSink> = if dry_run {
        tracing::info!("Dry run mode enabled - no files will be written");
        println!("🔍 DRY RUN MODE - No files will be written");
        println!();
        Arc::new(DryRunSink)
    } else {
        Arc::new(LocalFileSink)
    };

    println!(
        "🚀 Exporting {} records into {}",
        records.len(),
        config.base_dir.display()
    );
    println!();

    let engine = ExportEngine::new(sink, &config.base_dir)
        .with_max_concurrency(config.max_concurrency);
    let summary = engine.export_all(records, Some(shutdown_signal)).await;
    summary.log_summary();
    print_export_summary(&summary);
    summary
}

/// Print the export summary
pub fn print_export_summary(summary: &ExportSummary) {
    println!("📊 Export Summary:");
    println!("  Total Records: {}", summary.total_records);
    println!("  Exported: {}", summary.exported_records);
    println!("  Failed: {}", summary.failed_records);
    println!("  Skipped: {}", summary.skipped_records);
    println!("  Person Directories: {}", summary.person_directories);
    println!("  Files Written: {}", summary.files_written);
    println!("  File Failures: {}", summary.file_failures);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if !summary.errors.is_empty() {
        println!("⚠️  Errors encountered:");
        for error in summary.errors.iter().take(10) {
            println!("  - {:?}: {}", error.error_type, error.message);
            if let Some(context) = &error.context {
                println!("    Context: {context}");
            }
        }
        if summary.errors.len() > 10 {
            println!("  ... and {} more errors", summary.errors.len() - 10);
        }
        println!();
    }
}

/// Exit code for an export run
pub fn export_exit_code(summary: &ExportSummary) -> i32 {
    if summary.skipped_records > 0 {
        println!("⚠️  Export interrupted. Files already written were kept.");
        130
    } else if summary.is_successful() {
        println!("✅ Export completed successfully!");
        0
    } else {
        println!("⚠️  Export completed with failures");
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::{ExportError, ExportErrorType};

    #[test]
    fn test_export_args_defaults() {
        let args = ExportArgs::default();
        let mut config = HarvestConfig::default();
        let before = config.export.clone();

        args.apply(&mut config);

        assert_eq!(config.export.base_dir, before.base_dir);
        assert!(!config.export.dry_run);
    }

    #[test]
    fn test_export_args_with_overrides() {
        let args = ExportArgs {
            input: Some(PathBuf::from("in.json")),
            base_dir: Some(PathBuf::from("out")),
            concurrency: Some(8),
            dry_run: true,
        };
        let mut config = HarvestConfig::default();

        args.apply(&mut config);

        assert_eq!(config.export.input_path, PathBuf::from("in.json"));
        assert_eq!(config.export.base_dir, PathBuf::from("out"));
        assert_eq!(config.export.max_concurrency, 8);
        assert!(config.export.dry_run);
    }

    #[test]
    fn test_export_exit_codes() {
        let mut summary = ExportSummary::new();
        assert_eq!(export_exit_code(&summary), 0);

        summary.failed_records = 1;
        summary.add_error(ExportError::new(ExportErrorType::File, "x".to_string()));
        assert_eq!(export_exit_code(&summary), 1);

        summary.skipped_records = 3;
        assert_eq!(export_exit_code(&summary), 130);
    }
}
