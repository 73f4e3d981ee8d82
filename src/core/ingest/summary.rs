//! Ingestion run summary and terminal outcome

use std::time::Duration;

/// Why a run finished in the `Done` state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneReason {
    /// The empty-page threshold was reached
    Exhausted,
    /// The next page would exceed `max_pages`
    PageLimit,
}

/// Terminal state of an ingestion run
///
/// Every outcome carries a valid result. The distinction only matters for
/// diagnostics and exit codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Pagination finished normally
    Done(DoneReason),

    /// A non-transient fetch error stopped pagination at `page`
    Aborted { page: u32, error: String },

    /// A shutdown signal was observed before `page` was requested
    Interrupted { page: u32 },
}

impl IngestOutcome {
    /// True for `Done`
    pub fn is_done(&self) -> bool {
        matches!(self, IngestOutcome::Done(_))
    }

    /// Short label used in logs and the CLI summary
    pub fn label(&self) -> &'static str {
        match self {
            IngestOutcome::Done(DoneReason::Exhausted) => "done (no more pages)",
            IngestOutcome::Done(DoneReason::PageLimit) => "done (page limit reached)",
            IngestOutcome::Aborted { .. } => "aborted",
            IngestOutcome::Interrupted { .. } => "interrupted",
        }
    }
}

/// Counters collected by the ingestion loop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Pages that returned a response (empty or not)
    pub pages_fetched: u32,

    /// Pages that returned an empty batch
    pub empty_pages: u32,

    /// Transient server errors that triggered a backoff
    pub transient_errors: u32,

    /// Records received across all pages
    pub records_seen: usize,

    /// Records accepted into the result
    pub accepted: usize,

    /// Records dropped because their identity was already seen
    pub duplicates_skipped: usize,

    /// Records dropped because no identity could be derived
    pub unidentifiable_skipped: usize,

    /// Highest page index requested
    pub last_page: u32,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl IngestSummary {
    /// Log the summary
    pub fn log_summary(&self, outcome: &IngestOutcome) {
        tracing::info!(
            outcome = outcome.label(),
            pages_fetched = self.pages_fetched,
            last_page = self.last_page,
            records_seen = self.records_seen,
            accepted = self.accepted,
            duplicates_skipped = self.duplicates_skipped,
            unidentifiable_skipped = self.unidentifiable_skipped,
            transient_errors = self.transient_errors,
            duration_secs = self.duration.as_secs_f64(),
            "Ingestion finished"
        );

        if let IngestOutcome::Aborted { page, error } = outcome {
            tracing::warn!(
                page,
                error = %error,
                accepted = self.accepted,
                "Pagination aborted; records collected so far are kept"
            );
        }
    }
}
