//! Integration tests for the paginated ingestion loop
//!
//! A scripted fetcher answers by page index; pages without a script return an
//! empty batch. All delays are zero so the tests run instantly.

use async_trait::async_trait;
use harvest::adapters::api::PageFetcher;
use harvest::core::ingest::{
    DoneReason, IngestOutcome, IngestSettings, IngestionLoop, IngestionResult,
};
use harvest::domain::{FetchError, Record};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Clone)]
enum Page {
    Ids(Vec<&'static str>),
    Status(u16),
    Malformed,
}

struct ScriptedFetcher {
    pages: HashMap<u32, Page>,
    requested: Mutex<Vec<u32>>,
}

impl ScriptedFetcher {
    fn new(pages: impl IntoIterator<Item = (u32, Page)>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn requested(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch_page(&self, page: u32, _page_size: u32) -> Result<Vec<Record>, FetchError> {
        self.requested.lock().unwrap().push(page);
        match self.pages.get(&page).cloned() {
            None => Ok(Vec::new()),
            Some(Page::Ids(ids)) => Ok(ids.into_iter().map(record).collect()),
            Some(Page::Status(status)) => Err(FetchError::from_status(status, "scripted")),
            Some(Page::Malformed) => Err(FetchError::InvalidResponse("not an array".into())),
        }
    }

    fn endpoint(&self) -> &str {
        "scripted://profiles"
    }
}

fn record(id: &str) -> Record {
    Record::new(json!({
        "username": format!("user{id}"),
        "profile": { "user_id": id, "fio": format!("Person {id}") }
    }))
}

fn settings() -> IngestSettings {
    IngestSettings {
        request_delay: Duration::ZERO,
        backoff_delay: Duration::ZERO,
        ..Default::default()
    }
}

fn ids(result: &IngestionResult) -> Vec<String> {
    result
        .records
        .iter()
        .map(|r| r.identity().unwrap().into_inner())
        .collect()
}

#[tokio::test]
async fn test_terminates_after_three_empty_pages() {
    let fetcher = ScriptedFetcher::new([
        (1, Page::Ids(vec!["1", "2"])),
        (2, Page::Ids(vec!["3"])),
    ]);

    let result = IngestionLoop::new(&fetcher, settings()).run().await;

    assert_eq!(result.outcome, IngestOutcome::Done(DoneReason::Exhausted));
    assert_eq!(ids(&result), vec!["1", "2", "3"]);
    assert_eq!(fetcher.requested(), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_transient_error_on_page_five_continues_to_page_six() {
    let fetcher = ScriptedFetcher::new([
        (1, Page::Ids(vec!["1"])),
        (2, Page::Ids(vec!["2"])),
        (3, Page::Ids(vec!["3"])),
        (4, Page::Ids(vec!["4"])),
        (5, Page::Status(502)),
        (6, Page::Ids(vec!["6a", "6b"])),
    ]);

    let result = IngestionLoop::new(&fetcher, settings()).run().await;

    assert!(result.outcome.is_done());
    assert_eq!(ids(&result), vec!["1", "2", "3", "4", "6a", "6b"]);
    assert_eq!(result.summary.transient_errors, 1);
    assert_eq!(&fetcher.requested()[..6], &[1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn test_rate_limit_is_transient() {
    let fetcher = ScriptedFetcher::new([
        (1, Page::Status(429)),
        (2, Page::Ids(vec!["2"])),
    ]);

    let result = IngestionLoop::new(&fetcher, settings()).run().await;

    assert!(result.outcome.is_done());
    assert_eq!(ids(&result), vec!["2"]);
}

#[tokio::test]
async fn test_other_error_on_page_three_keeps_pages_one_and_two() {
    let fetcher = ScriptedFetcher::new([
        (1, Page::Ids(vec!["1", "2"])),
        (2, Page::Ids(vec!["3", "4"])),
        (3, Page::Status(404)),
        (4, Page::Ids(vec!["never"])),
    ]);

    let result = IngestionLoop::new(&fetcher, settings()).run().await;

    match &result.outcome {
        IngestOutcome::Aborted { page, error } => {
            assert_eq!(*page, 3);
            assert!(error.contains("404"));
        }
        other => panic!("expected abort, got {other:?}"),
    }
    assert_eq!(ids(&result), vec!["1", "2", "3", "4"]);
    assert_eq!(fetcher.requested(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_malformed_page_aborts_with_partial_result() {
    let fetcher = ScriptedFetcher::new([(1, Page::Ids(vec!["1"])), (2, Page::Malformed)]);

    let result = IngestionLoop::new(&fetcher, settings()).run().await;

    assert!(matches!(result.outcome, IngestOutcome::Aborted { page: 2, .. }));
    assert_eq!(ids(&result), vec!["1"]);
}

#[tokio::test]
async fn test_dedup_keeps_first_seen_order() {
    let fetcher = ScriptedFetcher::new([
        (1, Page::Ids(vec!["5", "3", "5"])),
        (2, Page::Ids(vec!["3", "9", "1"])),
        (3, Page::Ids(vec!["1", "5"])),
        (4, Page::Ids(vec!["2"])),
    ]);

    let result = IngestionLoop::new(&fetcher, settings()).run().await;

    let got = ids(&result);
    assert_eq!(got, vec!["5", "3", "9", "1", "2"]);
    let unique: HashSet<_> = got.iter().collect();
    assert_eq!(unique.len(), got.len());
    assert_eq!(result.summary.records_seen, 9);
    assert_eq!(result.summary.duplicates_skipped, 4);
    assert!(result.records.len() <= result.summary.records_seen);
}

#[tokio::test]
async fn test_page_limit_stops_endless_source() {
    struct EndlessFetcher;

    #[async_trait]
    impl PageFetcher for EndlessFetcher {
        async fn fetch_page(&self, page: u32, _: u32) -> Result<Vec<Record>, FetchError> {
            Ok(vec![record(&page.to_string())])
        }

        fn endpoint(&self) -> &str {
            "endless"
        }
    }

    let limited = IngestSettings {
        max_pages: 10,
        ..settings()
    };

    let result = IngestionLoop::new(&EndlessFetcher, limited).run().await;

    assert_eq!(result.outcome, IngestOutcome::Done(DoneReason::PageLimit));
    assert_eq!(result.records.len(), 10);
    assert_eq!(result.summary.last_page, 10);
}

#[tokio::test]
async fn test_start_page_is_honored() {
    let fetcher = ScriptedFetcher::new([
        (1, Page::Ids(vec!["skipped"])),
        (4, Page::Ids(vec!["4"])),
    ]);
    let from_four = IngestSettings {
        start_page: 4,
        ..settings()
    };

    let result = IngestionLoop::new(&fetcher, from_four).run().await;

    assert_eq!(ids(&result), vec!["4"]);
    assert_eq!(fetcher.requested()[0], 4);
}

#[tokio::test]
async fn test_threshold_is_only_checked_after_a_response() {
    let fetcher = ScriptedFetcher::new([
        (1, Page::Ids(vec!["1"])),
        (2, Page::Status(500)),
        (3, Page::Status(500)),
        (4, Page::Status(500)),
        (5, Page::Ids(vec!["never"])),
    ]);
    let threshold = IngestSettings {
        empty_page_threshold: 3,
        ..settings()
    };

    let result = IngestionLoop::new(&fetcher, threshold).run().await;

    // The third backoff does not end the run; the next response decides.
    assert_eq!(fetcher.requested(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(ids(&result), vec!["1", "never"]);
}

#[tokio::test]
async fn test_backoffs_count_towards_empty_threshold() {
    let fetcher = ScriptedFetcher::new([
        (1, Page::Ids(vec!["1"])),
        (2, Page::Status(500)),
        (3, Page::Status(503)),
        (5, Page::Ids(vec!["never"])),
    ]);

    let result = IngestionLoop::new(&fetcher, settings()).run().await;

    assert_eq!(result.outcome, IngestOutcome::Done(DoneReason::Exhausted));
    assert_eq!(fetcher.requested(), vec![1, 2, 3, 4]);
    assert_eq!(ids(&result), vec!["1"]);
}

#[tokio::test]
async fn test_records_without_identity_are_skipped() {
    struct NoIdFetcher;

    #[async_trait]
    impl PageFetcher for NoIdFetcher {
        async fn fetch_page(&self, page: u32, _: u32) -> Result<Vec<Record>, FetchError> {
            Ok(match page {
                1 => vec![
                    Record::new(json!({ "profile": { "fio": "Anonymous" } })),
                    Record::new(json!({ "username": "only_username" })),
                    Record::new(json!({ "username": " ", "profile": { "user_id": "" } })),
                ],
                _ => Vec::new(),
            })
        }

        fn endpoint(&self) -> &str {
            "no-id"
        }
    }

    let result = IngestionLoop::new(&NoIdFetcher, settings()).run().await;

    assert_eq!(ids(&result), vec!["only_username"]);
    assert_eq!(result.summary.unidentifiable_skipped, 2);
}
