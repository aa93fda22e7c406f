//! Crawled page data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A page discovered during a crawl run.
///
/// Created once when a frontier URL is successfully fetched and parsed,
/// immutable afterwards. The crawl result keeps pages in discovery order;
/// the first entry is the seed page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    /// Canonical absolute URL, unique within one crawl run
    pub url: String,

    /// Document title (may be empty)
    pub title: String,

    /// Meta description, falling back to `og:description` (may be empty)
    pub description: String,

    /// Last-Modified response header, or the crawl time when absent
    pub last_modified: DateTime<Utc>,
}
