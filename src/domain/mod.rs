//! Domain models and types for Harvest.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Records** ([`Record`]) - the raw profile objects returned by the API
//! - **Identity** ([`IdentityKey`]) - the deduplication key of a record
//! - **Error types** ([`HarvestError`], [`FetchError`], [`RecordError`], [`FilesystemError`])
//! - **Result type alias** ([`Result`])
//!
//! # Identity
//!
//! ```rust
//! use harvest::domain::Record;
//! use serde_json::json;
//!
//! let record = Record::new(json!({"username": "alisher", "profile": {"user_id": "17"}}));
//! assert_eq!(record.identity().unwrap().as_str(), "17");
//! ```

pub mod context;
pub mod errors;
pub mod ids;
pub mod record;
pub mod result;

pub use errors::{FetchError, FetchErrorKind, FilesystemError, HarvestError, RecordError};
pub use ids::IdentityKey;
pub use record::Record;
pub use result::Result;
