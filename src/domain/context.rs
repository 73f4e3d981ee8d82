//! Error context extension trait
//!
//! Provides `.context()` / `.with_context()` for `Result<T, HarvestError>`,
//! similar to `anyhow::Context` but keeping the domain error type.
//!
//! ```rust
//! use harvest::domain::Result;
//! use harvest::domain::context::ResultExt;
//!
//! fn read_input(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))
//! }
//! ```

use crate::domain::errors::HarvestError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error (evaluated eagerly)
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context to an error, computed only on failure
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<HarvestError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| wrap(e.into(), context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| wrap(e.into(), f()))
    }
}

/// Parse errors keep their variant so callers can still tell them apart.
fn wrap(base: HarvestError, context: impl std::fmt::Display) -> HarvestError {
    match base {
        HarvestError::Parse(msg) => HarvestError::Parse(format!("{context}: {msg}")),
        HarvestError::Configuration(msg) => {
            HarvestError::Configuration(format!("{context}: {msg}"))
        }
        other => HarvestError::Other(format!("{context}: {other}")),
    }
}
