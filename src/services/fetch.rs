// src/services/fetch.rs

//! Page fetch collaborator.
//!
//! The crawler only needs "give me the HTML body and the Last-Modified
//! header of this URL, or a failure". Anything that is not a 2xx `text/html`
//! response counts as a failure.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{CONTENT_TYPE, LAST_MODIFIED};
use reqwest::redirect::Policy;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// A successfully fetched HTML page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Raw HTML body
    pub html: String,

    /// Parsed `Last-Modified` response header, if present
    pub last_modified: Option<DateTime<Utc>>,
}

/// Fetch seam between the crawler and the HTTP layer.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one URL. Errors cover transport failures, non-2xx statuses
    /// and non-HTML content types alike; the crawler treats them all as a
    /// skip.
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

/// reqwest-backed fetcher.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher from crawler configuration.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .redirect(Policy::limited(config.max_redirects))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::crawl(url, format!("HTTP status {status}")));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !content_type.contains("text/html") {
            return Err(AppError::crawl(
                url,
                format!("Not an HTML response: {content_type}"),
            ));
        }

        let last_modified = response
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| DateTime::parse_from_rfc2822(v.trim()).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let html = response.text().await?;

        Ok(FetchedPage {
            html,
            last_modified,
        })
    }
}
