//! Core business logic
//!
//! This module contains the core business logic for Harvest:
//! - Field normalization (sanitizer, phones, organization names)
//! - Paginated ingestion with deduplication and backoff
//! - Hierarchical export of the ingested records

pub mod export;
pub mod ingest;
pub mod normalize;
