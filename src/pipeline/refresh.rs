// src/pipeline/refresh.rs

//! Scheduled refresh pipeline.
//!
//! Re-crawls every registered domain whose refresh interval has elapsed.
//! Crawls run with bounded concurrency; registry metadata is updated in a
//! single pass at the end so one save reflects the whole run.

use chrono::Utc;
use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::{Config, DomainRecord, touch_crawl_meta};
use crate::pipeline::crawl::crawl_and_publish;
use crate::services::HttpFetcher;
use crate::storage::{DomainRegistry, LocalStorage};

/// Summary of a refresh run.
#[derive(Debug, Default)]
pub struct RefreshOutcome {
    /// Domains re-crawled successfully
    pub refreshed: usize,

    /// Domains whose interval has not elapsed yet
    pub skipped: usize,

    /// Domains whose crawl failed
    pub failed: usize,
}

/// Re-crawl all due domains and rewrite their feeds.
///
/// Per-domain failures are logged and counted; the run continues with the
/// remaining domains.
pub async fn run_refresh(config: &Config, storage: &LocalStorage) -> Result<RefreshOutcome> {
    let records = storage.load().await?;
    if records.is_empty() {
        log::info!("No registered domains.");
        return Ok(RefreshOutcome::default());
    }

    let now = Utc::now();
    let (due, waiting): (Vec<DomainRecord>, Vec<DomainRecord>) =
        records.iter().cloned().partition(|r| r.is_due(now));

    for record in &waiting {
        log::debug!("Skipping {} (interval not elapsed)", record.domain);
    }

    let mut outcome = RefreshOutcome {
        skipped: waiting.len(),
        ..RefreshOutcome::default()
    };
    if due.is_empty() {
        log::info!("All {} registered domains are up to date.", records.len());
        return Ok(outcome);
    }

    log::info!("Refreshing {} of {} domains", due.len(), records.len());

    let concurrency = config.crawler.max_concurrent.max(1);
    let mut crawls = stream::iter(due)
        .map(|record| async move {
            let result = match HttpFetcher::new(&config.crawler) {
                Ok(fetcher) => {
                    crawl_and_publish(fetcher, config, storage, &record.url, record.max_pages)
                        .await
                }
                Err(e) => Err(e),
            };
            (record, result)
        })
        .buffer_unordered(concurrency);

    let mut touched: Vec<(String, usize)> = Vec::new();
    while let Some((record, result)) = crawls.next().await {
        match result {
            Ok(summary) => {
                log::info!("Refreshed {} ({} pages)", summary.domain, summary.page_count);
                touched.push((summary.domain, summary.page_count));
                outcome.refreshed += 1;
            }
            Err(e) => {
                log::warn!("Failed to refresh {}: {}", record.domain, e);
                outcome.failed += 1;
            }
        }
    }

    // One pure-transform pass over the original list, one save.
    if !touched.is_empty() {
        let mut updated = records;
        for (domain, page_count) in touched {
            updated = touch_crawl_meta(updated, &domain, page_count, now);
        }
        storage.save(&updated).await?;
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::models::RefreshInterval;

    #[tokio::test]
    async fn test_refresh_with_empty_registry() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let config = Config::default();

        let outcome = run_refresh(&config, &storage).await.unwrap();
        assert_eq!(outcome.refreshed, 0);
        assert_eq!(outcome.skipped, 0);
        assert_eq!(outcome.failed, 0);
    }

    #[tokio::test]
    async fn test_refresh_skips_domains_within_interval() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let config = Config::default();

        let record = DomainRecord {
            url: "https://example.com".to_string(),
            domain: "example.com".to_string(),
            max_pages: 10,
            interval: RefreshInterval::Daily,
            last_crawled: Some(Utc::now()),
            page_count: 4,
            registered_at: Utc::now(),
        };
        storage.save(&[record.clone()]).await.unwrap();

        let outcome = run_refresh(&config, &storage).await.unwrap();
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.refreshed, 0);

        // Registry left untouched
        let records = storage.load().await.unwrap();
        assert_eq!(records, vec![record]);
    }
}
