// src/feed/sitemap.rs

//! Sitemap generation per the Sitemaps.org 0.9 protocol.

use crate::models::Page;

use super::{escape_xml, w3c_datetime};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Serialize pages into a `sitemap.xml` document.
///
/// One `<url>` entry per page, in input order. The first entry is the
/// seed page and gets `priority` 1.0 with `changefreq` daily; every other
/// entry gets 0.5/weekly.
pub fn to_sitemap(pages: &[Page]) -> String {
    let mut xml = String::with_capacity(256 + pages.len() * 160);

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"");
    xml.push_str(SITEMAP_NS);
    xml.push_str("\">\n");

    for (i, page) in pages.iter().enumerate() {
        let (priority, changefreq) = if i == 0 {
            ("1.0", "daily")
        } else {
            ("0.5", "weekly")
        };

        xml.push_str("  <url>\n    <loc>");
        xml.push_str(&escape_xml(&page.url));
        xml.push_str("</loc>\n    <lastmod>");
        xml.push_str(&w3c_datetime(page.last_modified));
        xml.push_str("</lastmod>\n    <changefreq>");
        xml.push_str(changefreq);
        xml.push_str("</changefreq>\n    <priority>");
        xml.push_str(priority);
        xml.push_str("</priority>\n  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn page(url: &str) -> Page {
        Page {
            url: url.to_string(),
            title: String::new(),
            description: String::new(),
            last_modified: Utc.with_ymd_and_hms(2024, 1, 15, 1, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_sitemap_empty() {
        let xml = to_sitemap(&[]);
        assert!(xml.contains(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#)));
        assert!(!xml.contains("<url>"));
    }

    #[test]
    fn test_sitemap_entry_count_matches_input() {
        let pages = vec![
            page("https://example.com/"),
            page("https://example.com/a"),
            page("https://example.com/b"),
        ];
        let xml = to_sitemap(&pages);
        assert_eq!(xml.matches("<url>").count(), 3);
        assert_eq!(xml.matches("</url>").count(), 3);
    }

    #[test]
    fn test_first_entry_gets_elevated_priority() {
        let pages = vec![page("https://example.com/"), page("https://example.com/a")];
        let xml = to_sitemap(&pages);

        assert_eq!(xml.matches("<priority>1.0</priority>").count(), 1);
        assert_eq!(xml.matches("<changefreq>daily</changefreq>").count(), 1);
        assert_eq!(xml.matches("<priority>0.5</priority>").count(), 1);
        assert_eq!(xml.matches("<changefreq>weekly</changefreq>").count(), 1);

        // Elevated priority belongs to the seed entry
        let root_pos = xml.find("https://example.com/</loc>").unwrap();
        let elevated_pos = xml.find("<priority>1.0</priority>").unwrap();
        let second_pos = xml.find("https://example.com/a</loc>").unwrap();
        assert!(root_pos < elevated_pos && elevated_pos < second_pos);
    }

    #[test]
    fn test_lastmod_uses_fixed_offset() {
        let xml = to_sitemap(&[page("https://example.com/")]);
        assert!(xml.contains("<lastmod>2024-01-15T10:30:00+09:00</lastmod>"));
    }

    #[test]
    fn test_loc_is_escaped() {
        let xml = to_sitemap(&[page("https://example.com/search?q=a&b=c")]);
        assert!(xml.contains("<loc>https://example.com/search?q=a&amp;b=c</loc>"));
    }
}
