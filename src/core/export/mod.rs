//! Hierarchical export
//!
//! - [`engine`] - region/organization/person tree writer
//! - [`files`] - the derived file set of one record
//! - [`summary`] - counters and errors of an export run

pub mod engine;
pub mod files;
pub mod summary;

pub use engine::{ExportEngine, ExportTarget, RecordReport};
pub use files::{DerivedFile, DerivedFileSet, ALL_JSON};
pub use summary::{ExportError, ExportErrorType, ExportSummary};
