//! HTTP page fetcher.
//!
//! Follows redirects up to a configured limit and reports the final URL,
//! status, and body. Every failure is folded into a [`FetchError`] so one
//! bad site never aborts a batch.

use std::time::Duration;

use reqwest::{redirect, Client};
use widgetscan_core::{AppConfig, FetchError};

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

const MAX_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Raw markup and response metadata for one successfully fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL after following redirects.
    pub final_url: String,
    pub status: u16,
    pub body: String,
}

pub type FetchOutcome = Result<FetchedPage, FetchError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub max_redirects: usize,
    pub max_retries: u32,
    pub backoff_base_secs: u64,
}

impl FetchSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_redirects: config.max_redirects,
            max_retries: config.max_retries,
            backoff_base_secs: config.retry_backoff_base_secs,
        }
    }
}

/// Fetches practice websites with a shared connection pool.
pub struct PageFetcher {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl PageFetcher {
    /// Creates a fetcher with the configured timeout, `User-Agent`, redirect
    /// limit, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(settings: &FetchSettings) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(
                settings.timeout_secs.min(MAX_CONNECT_TIMEOUT_SECS),
            ))
            .user_agent(settings.user_agent.as_str())
            .redirect(redirect::Policy::limited(settings.max_redirects))
            .build()?;
        Ok(Self {
            client,
            max_retries: settings.max_retries,
            backoff_base_secs: settings.backoff_base_secs,
        })
    }

    /// Fetches `url`, retrying transient failures.
    ///
    /// A non-2xx final status is a failure carrying the status and the URL
    /// it was served from.
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let parsed =
            reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        let outcome = retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            self.fetch_once(parsed.clone())
        })
        .await;

        match &outcome {
            Ok(page) => tracing::debug!(
                url,
                final_url = %page.final_url,
                status = page.status,
                bytes = page.body.len(),
                "fetched page"
            ),
            Err(err) => tracing::warn!(url, error = %err, "fetch failed"),
        }
        outcome
    }

    async fn fetch_once(&self, url: reqwest::Url) -> FetchOutcome {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        let final_url = response.url().to_string();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                final_url,
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Body(e.to_string())
            }
        })?;

        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            body,
        })
    }
}

fn classify_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_connect() {
        FetchError::Connect(err.to_string())
    } else if err.is_redirect() {
        FetchError::Other("too many redirects".to_string())
    } else if err.is_builder() {
        FetchError::InvalidUrl(err.to_string())
    } else if err.is_body() || err.is_decode() {
        FetchError::Body(err.to_string())
    } else {
        FetchError::Other(err.to_string())
    }
}
