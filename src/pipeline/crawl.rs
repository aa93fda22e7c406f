// src/pipeline/crawl.rs

//! One-off crawl pipeline: crawl a site, publish its feeds, update the
//! registry metadata when the domain is registered.

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::feed::{RssChannel, to_rss, to_sitemap};
use crate::models::{Config, touch_crawl_meta};
use crate::services::{HttpFetcher, PageFetcher, SiteCrawler};
use crate::storage::{DomainRegistry, FeedPaths, LocalStorage};
use crate::utils::url::domain_key;

/// Result of one crawl-and-publish run.
#[derive(Debug)]
pub struct CrawlSummary {
    /// Registry key of the crawled site
    pub domain: String,

    /// Number of pages collected
    pub page_count: usize,

    /// Where the feeds were written
    pub feeds: FeedPaths,
}

/// Crawl `url` and publish its feeds.
///
/// `max_pages` falls back to the configured default budget. When the
/// domain is registered, its `last_crawled`/`page_count` metadata is
/// updated afterwards.
pub async fn run_crawl(
    config: &Config,
    storage: &LocalStorage,
    url: &str,
    max_pages: Option<usize>,
) -> Result<CrawlSummary> {
    let max_pages = max_pages.unwrap_or(config.crawler.max_pages);
    let fetcher = HttpFetcher::new(&config.crawler)?;
    let summary = crawl_and_publish(fetcher, config, storage, url, max_pages).await?;

    let records = storage.load().await?;
    if records.iter().any(|r| r.domain == summary.domain) {
        let updated = touch_crawl_meta(records, &summary.domain, summary.page_count, Utc::now());
        storage.save(&updated).await?;
    }

    Ok(summary)
}

/// Crawl with the given fetcher and write `sitemap.xml` / `rss.xml`.
///
/// Zero collected pages is reported as a "no pages found" error; the
/// crawler itself returning an empty list is legitimate, but there is
/// nothing to publish.
pub(crate) async fn crawl_and_publish<F: PageFetcher>(
    fetcher: F,
    config: &Config,
    storage: &LocalStorage,
    url: &str,
    max_pages: usize,
) -> Result<CrawlSummary> {
    let crawler = SiteCrawler::new(fetcher, url, max_pages)?;
    let domain = domain_key(crawler.start_url())
        .ok_or_else(|| AppError::validation(format!("Cannot derive a domain from {url}")))?;

    log::info!(
        "Crawling {} (budget: {} pages)",
        crawler.start_url(),
        max_pages
    );
    let pages = crawler.run().await?;

    if pages.is_empty() {
        return Err(AppError::crawl(url, "no pages found"));
    }
    log::info!("Collected {} pages from {}", pages.len(), domain);

    let sitemap = to_sitemap(&pages);
    let rss = to_rss(
        &pages,
        &RssChannel {
            link: crawler.start_url(),
            title: None,
            description: None,
            language: &config.feed.language,
        },
        Utc::now(),
    );

    let feeds = storage.write_feeds(&domain, &sitemap, &rss).await?;
    log::info!(
        "Wrote {} and {}",
        feeds.sitemap.display(),
        feeds.rss.display()
    );

    Ok(CrawlSummary {
        domain,
        page_count: pages.len(),
        feeds,
    })
}
