//! Logging and observability
//!
//! Structured logging via `tracing`, plus a couple of macros that keep the
//! field names of recurring events consistent across the ingestion loop and
//! the export engine.
//!
//! ```no_run
//! use harvest::logging::init_logging;
//! use harvest::config::LoggingConfig;
//!
//! let _guard = init_logging("info", &LoggingConfig::default()).expect("logging");
//! tracing::info!(page = 1, "Fetching page");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the outcome of one non-empty page
///
/// ```no_run
/// use harvest::log_page_accepted;
///
/// log_page_accepted!(3, 100, 97, 1200);
/// ```
#[macro_export]
macro_rules! log_page_accepted {
    ($page:expr, $batch_size:expr, $accepted:expr, $total:expr) => {
        tracing::info!(
            page = $page,
            batch_size = $batch_size,
            accepted = $accepted,
            total = $total,
            "Page ingested"
        );
    };
}

/// Log an error with context
///
/// ```no_run
/// use harvest::log_error_with_context;
/// use harvest::domain::HarvestError;
///
/// let error = HarvestError::Parse("unexpected EOF".to_string());
/// log_error_with_context!(&error, "Failed to load snapshot");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
