// src/feed/mod.rs

//! Feed serialization.
//!
//! Renders a crawled page list into `sitemap.xml` and `rss.xml` documents.
//! Both serializers are pure functions of their inputs. Timestamps are
//! rendered with a fixed `+09:00` offset, a deployment constant rather
//! than the machine's timezone.

pub mod rss;
pub mod sitemap;

pub use rss::{RssChannel, to_rss};
pub use sitemap::to_sitemap;

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, Utc};

/// Fixed feed timestamp offset (+09:00).
fn feed_offset() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("valid offset")
}

/// Render a timestamp as W3C datetime: `2024-01-15T10:30:00+09:00`.
pub(crate) fn w3c_datetime(at: DateTime<Utc>) -> String {
    at.with_timezone(&feed_offset())
        .format("%Y-%m-%dT%H:%M:%S%:z")
        .to_string()
}

/// Render a timestamp as RFC 822: `Mon, 15 Jan 2024 10:30:00 +0900`.
pub(crate) fn rfc822_datetime(at: DateTime<Utc>) -> String {
    at.with_timezone(&feed_offset())
        .format("%a, %d %b %Y %H:%M:%S %z")
        .to_string()
}

/// Escape special XML characters.
pub(crate) fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}
