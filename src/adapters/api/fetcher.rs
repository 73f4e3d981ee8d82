//! Page fetcher trait definition
//!
//! The ingestion loop depends only on this trait, so the HTTP implementation
//! can be swapped for a scripted fetcher in tests.

use crate::domain::{FetchError, Record};
use async_trait::async_trait;

/// One paginated request against the remote API
///
/// Implementations perform exactly one round trip per call and never retry
/// internally; retry and backoff policy belongs to the ingestion loop.
///
/// # Example
///
/// ```no_run
/// use harvest::adapters::api::{HttpPageFetcher, PageFetcher};
/// use harvest::config::ApiConfig;
///
/// # async fn example() -> harvest::domain::Result<()> {
/// let fetcher = HttpPageFetcher::new(ApiConfig::default())?;
/// let batch = fetcher.fetch_page(1, 100).await?;
/// println!("page 1 returned {} records", batch.len());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch page `page` (1-based) holding at most `page_size` records
    ///
    /// An empty vector means the page exists but holds no records.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`]; its [`kind`](FetchError::kind) tells the
    /// caller whether the failure is transient.
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Vec<Record>, FetchError>;

    /// Endpoint description used in log events
    fn endpoint(&self) -> &str;
}
