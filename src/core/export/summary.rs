//! Export summary and reporting

use std::time::Duration;

/// Summary of an export run
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Records handed to the engine
    pub total_records: usize,

    /// Records whose directory and every file were written
    pub exported_records: usize,

    /// Records with at least one failure
    pub failed_records: usize,

    /// Records never attempted because of a shutdown signal
    pub skipped_records: usize,

    /// Files written across all records
    pub files_written: usize,

    /// Individual file writes that failed
    pub file_failures: usize,

    /// Distinct person directories targeted
    pub person_directories: usize,

    /// Duration of the export
    pub duration: Duration,

    /// Errors encountered during export
    pub errors: Vec<ExportError>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: ExportError) {
        self.errors.push(error);
    }

    /// True when every attempted record exported cleanly
    pub fn is_successful(&self) -> bool {
        self.failed_records == 0 && self.errors.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total_records = self.total_records,
            exported = self.exported_records,
            failed = self.failed_records,
            skipped = self.skipped_records,
            files_written = self.files_written,
            file_failures = self.file_failures,
            person_directories = self.person_directories,
            duration_secs = self.duration.as_secs_f64(),
            "Export completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(error_count = self.errors.len(), "Export completed with errors");
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    message = %error.message,
                    context = error.context.as_deref().unwrap_or(""),
                    "Export error"
                );
            }
        }
    }
}

/// Type of export error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportErrorType {
    /// The record's fields could not be turned into a target or file set
    Record,
    /// A directory could not be created
    Directory,
    /// A file could not be written
    File,
}

/// Export error with context
#[derive(Debug, Clone)]
pub struct ExportError {
    /// Type of error
    pub error_type: ExportErrorType,

    /// Error message
    pub message: String,

    /// Optional context (record index, identity, path)
    pub context: Option<String>,
}

impl ExportError {
    /// Create a new export error
    pub fn new(error_type: ExportErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
            context: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }
}
