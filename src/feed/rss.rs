// src/feed/rss.rs

//! RSS 2.0 feed generation.

use chrono::{DateTime, Utc};

use crate::models::Page;
use crate::utils::url::host_of;

use super::{escape_xml, rfc822_datetime};

/// Newest pages included as `<item>` elements.
pub const RSS_ITEM_LIMIT: usize = 50;

/// Item description cap, counted in Unicode code points.
const DESCRIPTION_MAX_CHARS: usize = 200;

const GENERATOR: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// RSS channel metadata.
///
/// `title` and `description` are optional overrides; when absent they
/// default to the first page's metadata and fall back to the site host.
#[derive(Debug, Clone)]
pub struct RssChannel<'a> {
    /// Channel link (the crawl's seed URL)
    pub link: &'a str,

    /// Channel title override
    pub title: Option<&'a str>,

    /// Channel description override
    pub description: Option<&'a str>,

    /// Channel language code
    pub language: &'a str,
}

/// Serialize pages into an `rss.xml` document.
///
/// At most [`RSS_ITEM_LIMIT`] pages become items, in input order. The
/// `build_time` parameter is the channel's `lastBuildDate`, passed in so
/// output stays a deterministic function of the inputs.
pub fn to_rss(pages: &[Page], channel: &RssChannel, build_time: DateTime<Utc>) -> String {
    let title = channel
        .title
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| pages.first().map(|p| p.title.clone()).filter(|t| !t.is_empty()))
        .or_else(|| host_of(channel.link))
        .unwrap_or_else(|| channel.link.to_string());

    let description = channel
        .description
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .or_else(|| {
            pages
                .first()
                .map(|p| p.description.clone())
                .filter(|d| !d.is_empty())
        })
        .unwrap_or_else(|| title.clone());

    let mut xml = String::with_capacity(512 + pages.len().min(RSS_ITEM_LIMIT) * 256);

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<rss version=\"2.0\">\n");
    xml.push_str("  <channel>\n");
    xml.push_str("    <title>");
    xml.push_str(&escape_xml(&title));
    xml.push_str("</title>\n    <link>");
    xml.push_str(&escape_xml(channel.link));
    xml.push_str("</link>\n    <description>");
    xml.push_str(&escape_xml(&description));
    xml.push_str("</description>\n    <language>");
    xml.push_str(&escape_xml(channel.language));
    xml.push_str("</language>\n    <lastBuildDate>");
    xml.push_str(&rfc822_datetime(build_time));
    xml.push_str("</lastBuildDate>\n    <generator>");
    xml.push_str(GENERATOR);
    xml.push_str("</generator>\n");

    for page in pages.iter().take(RSS_ITEM_LIMIT) {
        let item_title = if page.title.is_empty() {
            &page.url
        } else {
            &page.title
        };
        let item_description: String = page.description.chars().take(DESCRIPTION_MAX_CHARS).collect();

        xml.push_str("    <item>\n      <title>");
        xml.push_str(&escape_xml(item_title));
        xml.push_str("</title>\n      <link>");
        xml.push_str(&escape_xml(&page.url));
        xml.push_str("</link>\n      <description>");
        xml.push_str(&escape_xml(&item_description));
        xml.push_str("</description>\n      <guid>");
        xml.push_str(&escape_xml(&page.url));
        xml.push_str("</guid>\n    </item>\n");
    }

    xml.push_str("  </channel>\n");
    xml.push_str("</rss>\n");
    xml
}
