//! External integrations
//!
//! - [`api`] - the paginated remote API ([`api::PageFetcher`], [`api::HttpPageFetcher`])
//! - [`filesystem`] - the "write file" capability used by the export engine

pub mod api;
pub mod filesystem;
