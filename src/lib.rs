// Harvest - Paginated Profile Ingestion and Directory Export
// Copyright (c) 2025 Harvest Contributors
// Licensed under the MIT License

//! # Harvest - paginated profile ingestion and per-person file export
//!
//! Harvest pages through a JSON profile API, deduplicates the records it
//! receives, saves them as one JSON array, and lays them out on disk as a
//! `<region>/<organization>/<person>/` tree of small, self-describing files.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (normalization, ingestion loop, export engine)
//! - [`adapters`] - External integrations (HTTP API, local filesystem)
//! - [`domain`] - Records, identity keys, error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use harvest::adapters::api::HttpPageFetcher;
//! use harvest::adapters::filesystem::LocalFileSink;
//! use harvest::config::load_config;
//! use harvest::core::export::ExportEngine;
//! use harvest::core::ingest::{write_snapshot, IngestionLoop};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("harvest.toml")?;
//!
//!     let fetcher = HttpPageFetcher::new(config.api.clone())?;
//!     let settings = config.ingest.settings(config.api.page_size);
//!     let result = IngestionLoop::new(&fetcher, settings).run().await;
//!     write_snapshot(&config.ingest.output_path, &result.records).await?;
//!
//!     let engine = ExportEngine::new(Arc::new(LocalFileSink), &config.export.base_dir);
//!     let summary = engine.export_all(&result.records, None).await;
//!
//!     println!("Exported {} records", summary.exported_records);
//!     Ok(())
//! }
//! ```
//!
//! ## Ingestion
//!
//! The [`core::ingest::IngestionLoop`] requests one page at a time. Empty
//! pages count towards a termination threshold, 5xx and 429 responses trigger
//! a backoff before the next page, and any other failure stops pagination.
//! Every terminal state still returns the records accepted so far.
//!
//! ## Error Handling
//!
//! Library code returns [`domain::Result`], built on [`domain::HarvestError`].
//! Per-record and per-file export failures never abort a batch; they are
//! collected into the [`core::export::ExportSummary`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
