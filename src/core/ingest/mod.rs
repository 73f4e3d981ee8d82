//! Paginated ingestion
//!
//! - [`pagination`] - the sequential fetch/dedup/backoff state machine
//! - [`summary`] - counters and terminal outcome of a run
//! - [`snapshot`] - the persisted JSON array of accepted records

pub mod pagination;
pub mod snapshot;
pub mod summary;

pub use pagination::{IngestSettings, IngestionLoop, IngestionResult, LoopState};
pub use snapshot::{read_snapshot, write_snapshot};
pub use summary::{DoneReason, IngestOutcome, IngestSummary};
