// src/services/crawler.rs

//! Breadth-first site crawler.
//!
//! Walks every reachable page of a single site from a seed URL, bounded by
//! a page budget. The frontier is a FIFO queue; filtering happens at
//! dequeue time, so the queue may hold duplicates and URLs that are later
//! discarded. A URL is marked visited before its fetch, which keeps
//! repeated enqueues of the same canonical form from fetching twice.

use std::collections::{HashSet, VecDeque};

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::Page;
use crate::services::extract::extract;
use crate::services::fetch::PageFetcher;
use crate::utils::url::{
    canonicalize, has_skipped_extension, host_of, resolve, same_domain, scheme_of,
};

/// Single-site BFS crawler.
///
/// Construction validates the seed URL and the page budget; everything that
/// goes wrong per URL during the run is a silent skip.
pub struct SiteCrawler<F> {
    fetcher: F,
    start_url: String,
    base_host: String,
    base_scheme: String,
    max_pages: usize,
}

impl<F: PageFetcher> SiteCrawler<F> {
    /// Create a crawler for `start_url` with the given page budget.
    ///
    /// Fails when the seed does not parse to an absolute URL with a host,
    /// or when `max_pages` is zero.
    pub fn new(fetcher: F, start_url: &str, max_pages: usize) -> Result<Self> {
        if max_pages == 0 {
            return Err(AppError::validation("Page budget must be positive"));
        }

        // Surface a parse error for clearly malformed seeds before the
        // string-level canonicalization takes over.
        let parsed = url::Url::parse(start_url.trim())?;
        if parsed.host_str().is_none() {
            return Err(AppError::validation(format!(
                "Seed URL has no host: {start_url}"
            )));
        }

        let start_url = canonicalize(start_url.trim().trim_end_matches('/'))
            .ok_or_else(|| AppError::validation(format!("Invalid seed URL: {start_url}")))?;
        let base_host = host_of(&start_url)
            .ok_or_else(|| AppError::validation(format!("Seed URL has no host: {start_url}")))?;
        let base_scheme = scheme_of(&start_url).unwrap_or("https").to_string();

        Ok(Self {
            fetcher,
            start_url,
            base_host,
            base_scheme,
            max_pages,
        })
    }

    /// Canonical seed URL the crawl starts from.
    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    /// Host the crawl is scoped to.
    pub fn base_host(&self) -> &str {
        &self.base_host
    }

    /// Run the crawl to completion and return pages in discovery order.
    ///
    /// The result is empty when the seed is unreachable or yields no HTML;
    /// that is a legitimate outcome, not an error.
    pub async fn run(&self) -> Result<Vec<Page>> {
        let mut queue: VecDeque<String> = VecDeque::from([self.start_url.clone()]);
        let mut visited: HashSet<String> = HashSet::new();
        let mut pages: Vec<Page> = Vec::new();

        while pages.len() < self.max_pages {
            let Some(next) = queue.pop_front() else {
                break;
            };

            let Some(url) = canonicalize(&next) else {
                continue;
            };
            // Mark visited before fetching
            if !visited.insert(url.clone()) {
                continue;
            }
            if has_skipped_extension(&url) {
                log::debug!("Skipping asset URL: {url}");
                continue;
            }
            match host_of(&url) {
                Some(host) if same_domain(&host, &self.base_host) => {}
                _ => {
                    log::debug!("Skipping off-domain URL: {url}");
                    continue;
                }
            }

            let fetched = match self.fetcher.fetch(&url).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    log::debug!("Skipping {url}: {e}");
                    continue;
                }
            };

            let extraction = extract(&fetched.html);
            let last_modified = fetched.last_modified.unwrap_or_else(Utc::now);

            pages.push(Page {
                url: url.clone(),
                title: extraction.title,
                description: extraction.description,
                last_modified,
            });

            for href in &extraction.links {
                let Some(absolute) = resolve(&url, href, &self.base_scheme) else {
                    continue;
                };
                let Some(link) = canonicalize(&absolute) else {
                    continue;
                };
                if !visited.contains(&link) {
                    queue.push_back(link);
                }
            }
        }

        Ok(pages)
    }
}
