// src/services/extract.rs

//! HTML metadata and link extraction.
//!
//! Parsing is best-effort: `Html::parse_document` builds a DOM out of
//! whatever it is given, so malformed markup degrades to empty results
//! instead of errors.

use std::sync::LazyLock;

use scraper::{Html, Selector};

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));
static META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta").expect("valid selector"));
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("valid selector"));

/// Metadata and outgoing links of one HTML document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// `<title>` text, falling back to `og:title` (may be empty)
    pub title: String,

    /// `<meta name="description">`, falling back to `og:description`
    pub description: String,

    /// Raw `href` values of `<a>` elements, in document order
    pub links: Vec<String>,
}

/// Extract title, description and hyperlinks from an HTML body.
pub fn extract(html: &str) -> Extraction {
    let document = Html::parse_document(html);

    let title_tag = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let mut description = String::new();
    let mut og_description = String::new();
    let mut og_title = String::new();

    for meta in document.select(&META_SELECTOR) {
        let Some(content) = meta.value().attr("content") else {
            continue;
        };
        let content = content.trim();
        if content.is_empty() {
            continue;
        }

        let name = meta.value().attr("name").unwrap_or_default();
        let property = meta.value().attr("property").unwrap_or_default();

        if name.eq_ignore_ascii_case("description") && description.is_empty() {
            description = content.to_string();
        }
        if property.eq_ignore_ascii_case("og:description") && og_description.is_empty() {
            og_description = content.to_string();
        }
        if property.eq_ignore_ascii_case("og:title") && og_title.is_empty() {
            og_title = content.to_string();
        }
    }

    let title = if title_tag.is_empty() { og_title } else { title_tag };
    let description = if description.is_empty() {
        og_description
    } else {
        description
    };

    let links = document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter(|href| !href.trim().is_empty())
        .map(str::to_string)
        .collect();

    Extraction {
        title,
        description,
        links,
    }
}
