//! HTTP page fetcher
//!
//! Issues `GET <base_url>?page=N&limit=M` (plus any configured static query
//! parameters) and decodes the body as a JSON array of records.

use super::PageFetcher;
use crate::config::ApiConfig;
use crate::domain::{FetchError, HarvestError, Record, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

/// reqwest-backed [`PageFetcher`]
pub struct HttpPageFetcher {
    base_url: Url,
    client: Client,
    config: ApiConfig,
}

impl HttpPageFetcher {
    /// Create a new fetcher from configuration
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the base URL does not parse or the
    /// HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            HarvestError::Configuration(format!("Invalid api.base_url {}: {e}", config.base_url))
        })?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                HarvestError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url,
            client,
            config,
        })
    }

    /// Full request URL for one page
    pub fn page_url(&self, page: u32, page_size: u32) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in &self.config.params {
                query.append_pair(key, value);
            }
            query.append_pair("page", &page.to_string());
            query.append_pair("limit", &page_size.to_string());
        }
        url
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> std::result::Result<Vec<Record>, FetchError> {
        let url = self.page_url(page, page_size);
        tracing::debug!(url = %url, page, page_size, "Requesting page");

        let mut request = self.client.get(url);
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token.expose_secret().as_ref());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(e.to_string())
            } else {
                FetchError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::from_status(status.as_u16(), body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::InvalidResponse(format!("Failed to read body: {e}")))?;

        serde_json::from_str::<Vec<Record>>(&body).map_err(|e| {
            FetchError::InvalidResponse(format!("Page {page} is not a JSON array of records: {e}"))
        })
    }

    fn endpoint(&self) -> &str {
        self.base_url.as_str()
    }
}
