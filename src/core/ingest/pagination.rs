//! Paginated ingestion loop
//!
//! Drives a [`PageFetcher`] one page at a time, deduplicates records by
//! [`IdentityKey`], and decides after every response whether to continue,
//! back off, or stop.
//!
//! ```text
//! Fetching(p) ── non-empty ──────────────▶ Fetching(p+1)   (after request delay)
//!     │        ── empty, count < limit ──▶ Fetching(p+1)
//!     │        ── empty, count = limit ──▶ Done(Exhausted)
//!     │        ── transient error ───────▶ Backoff(p) ──▶ Fetching(p+1)
//!     │        ── other error ───────────▶ Aborted
//!     └─ p > max_pages ──────────────────▶ Done(PageLimit)
//! ```
//!
//! The seen-set and accepted list live inside [`IngestionLoop`]; `run`
//! consumes the loop and hands them out once as an [`IngestionResult`].

use super::summary::{DoneReason, IngestOutcome, IngestSummary};
use crate::adapters::api::PageFetcher;
use crate::domain::{FetchErrorKind, IdentityKey, Record};
use crate::log_page_accepted;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Runtime settings for one ingestion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSettings {
    /// Records requested per page
    pub page_size: u32,
    /// First page requested
    pub start_page: u32,
    /// Pages beyond this index are never requested
    pub max_pages: u32,
    /// Pause between consecutive requests
    pub request_delay: Duration,
    /// Pause after a transient server error
    pub backoff_delay: Duration,
    /// Consecutive empty pages that end the run
    pub empty_page_threshold: u32,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            page_size: 100,
            start_page: 1,
            max_pages: 200,
            request_delay: Duration::from_millis(800),
            backoff_delay: Duration::from_millis(3000),
            empty_page_threshold: 3,
        }
    }
}

/// State of the pagination state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopState {
    /// About to request this page
    Fetching(u32),
    /// This page failed transiently; wait, then move past it
    Backoff(u32),
    /// Terminal
    Finished(IngestOutcome),
}

/// Deduplicated records of one run plus how the run ended
#[derive(Debug, Clone)]
pub struct IngestionResult {
    /// Accepted records in first-seen order, unique by identity
    pub records: Vec<Record>,
    /// Terminal state
    pub outcome: IngestOutcome,
    /// Counters
    pub summary: IngestSummary,
}

/// Sequential, single-flight pagination loop
pub struct IngestionLoop<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    settings: IngestSettings,
    shutdown: Option<watch::Receiver<bool>>,
    seen: HashSet<IdentityKey>,
    accepted: Vec<Record>,
    consecutive_empty: u32,
    summary: IngestSummary,
}

impl<'a, F: PageFetcher + ?Sized> IngestionLoop<'a, F> {
    /// Create a loop over `fetcher`
    pub fn new(fetcher: &'a F, settings: IngestSettings) -> Self {
        Self {
            fetcher,
            settings,
            shutdown: None,
            seen: HashSet::new(),
            accepted: Vec::new(),
            consecutive_empty: 0,
            summary: IngestSummary::default(),
        }
    }

    /// Stop early (keeping collected records) once `shutdown` turns `true`
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Run until a terminal state and return the collected records
    pub async fn run(mut self) -> IngestionResult {
        let started = Instant::now();
        tracing::info!(
            endpoint = self.fetcher.endpoint(),
            page_size = self.settings.page_size,
            start_page = self.settings.start_page,
            max_pages = self.settings.max_pages,
            "Starting paginated ingestion"
        );

        let mut state = LoopState::Fetching(self.settings.start_page);
        let outcome = loop {
            state = match state {
                LoopState::Fetching(page) if page > self.settings.max_pages => {
                    tracing::info!(
                        page,
                        max_pages = self.settings.max_pages,
                        "Page limit reached"
                    );
                    LoopState::Finished(IngestOutcome::Done(DoneReason::PageLimit))
                }
                LoopState::Fetching(page) if self.shutdown_requested() => {
                    LoopState::Finished(IngestOutcome::Interrupted { page })
                }
                LoopState::Fetching(page) => self.fetch(page).await,
                LoopState::Backoff(page) => {
                    self.consecutive_empty += 1;
                    tracing::debug!(
                        page,
                        delay_ms = self.settings.backoff_delay.as_millis() as u64,
                        consecutive_empty = self.consecutive_empty,
                        "Backing off after transient error"
                    );
                    if self.pause(self.settings.backoff_delay).await {
                        LoopState::Finished(IngestOutcome::Interrupted { page: page + 1 })
                    } else {
                        LoopState::Fetching(page + 1)
                    }
                }
                LoopState::Finished(outcome) => break outcome,
            };
        };

        self.summary.accepted = self.accepted.len();
        self.summary.duration = started.elapsed();
        self.summary.log_summary(&outcome);

        IngestionResult {
            records: self.accepted,
            outcome,
            summary: self.summary,
        }
    }

    async fn fetch(&mut self, page: u32) -> LoopState {
        self.summary.last_page = page;
        tracing::debug!(page, "Fetching page");

        match self.fetcher.fetch_page(page, self.settings.page_size).await {
            Ok(batch) if batch.is_empty() => {
                self.summary.pages_fetched += 1;
                self.summary.empty_pages += 1;
                self.consecutive_empty += 1;
                tracing::info!(
                    page,
                    consecutive_empty = self.consecutive_empty,
                    threshold = self.settings.empty_page_threshold,
                    "Empty page"
                );

                if self.consecutive_empty >= self.settings.empty_page_threshold {
                    LoopState::Finished(IngestOutcome::Done(DoneReason::Exhausted))
                } else {
                    self.advance(page).await
                }
            }
            Ok(batch) => {
                self.summary.pages_fetched += 1;
                let batch_size = batch.len();
                let accepted = self.accept_batch(page, batch);
                self.consecutive_empty = 0;
                log_page_accepted!(page, batch_size, accepted, self.accepted.len());
                self.advance(page).await
            }
            Err(e) => match e.kind() {
                FetchErrorKind::TransientServer => {
                    self.summary.transient_errors += 1;
                    tracing::warn!(page, error = %e, "Transient server error, backing off");
                    LoopState::Backoff(page)
                }
                FetchErrorKind::Other => {
                    tracing::error!(
                        page,
                        error = %e,
                        accepted = self.accepted.len(),
                        "Fetch failed, stopping pagination"
                    );
                    LoopState::Finished(IngestOutcome::Aborted {
                        page,
                        error: e.to_string(),
                    })
                }
            },
        }
    }

    /// Add first-seen records; returns how many were accepted
    fn accept_batch(&mut self, page: u32, batch: Vec<Record>) -> usize {
        let mut accepted = 0;
        for record in batch {
            self.summary.records_seen += 1;
            match record.identity() {
                Ok(key) => {
                    if self.seen.insert(key) {
                        self.accepted.push(record);
                        accepted += 1;
                    } else {
                        self.summary.duplicates_skipped += 1;
                    }
                }
                Err(e) => {
                    self.summary.unidentifiable_skipped += 1;
                    tracing::warn!(page, error = %e, "Skipping record without identity");
                }
            }
        }
        accepted
    }

    /// Move to the next page after the inter-request delay
    async fn advance(&mut self, page: u32) -> LoopState {
        let next = page + 1;
        if next > self.settings.max_pages {
            return LoopState::Fetching(next);
        }
        if self.pause(self.settings.request_delay).await {
            LoopState::Finished(IngestOutcome::Interrupted { page: next })
        } else {
            LoopState::Fetching(next)
        }
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Sleep for `delay`; returns true if shutdown was requested meanwhile
    async fn pause(&self, delay: Duration) -> bool {
        if delay.is_zero() {
            return self.shutdown_requested();
        }

        match &self.shutdown {
            None => {
                tokio::time::sleep(delay).await;
                false
            }
            Some(rx) => {
                let mut rx = rx.clone();
                tokio::select! {
                    _ = tokio::time::sleep(delay) => self.shutdown_requested(),
                    signalled = async {
                        if rx.wait_for(|stop| *stop).await.is_ok() {
                            true
                        } else {
                            // A dropped sender means no signal can ever arrive.
                            std::future::pending::<bool>().await
                        }
                    } => signalled,
                }
            }
        }
    }
}
