//! Registered domain records.
//!
//! The registry is a flat list of records persisted as JSON. Metadata
//! updates go through pure transforms that return a new list instead of
//! mutating records in place.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// How often a registered domain is re-crawled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RefreshInterval {
    Daily,
    Weekly,
}

impl RefreshInterval {
    /// Minimum elapsed time before the next refresh.
    pub fn period(&self) -> Duration {
        match self {
            RefreshInterval::Daily => Duration::days(1),
            RefreshInterval::Weekly => Duration::weeks(1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshInterval::Daily => "daily",
            RefreshInterval::Weekly => "weekly",
        }
    }
}

impl FromStr for RefreshInterval {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(RefreshInterval::Daily),
            "weekly" => Ok(RefreshInterval::Weekly),
            other => Err(AppError::validation(format!(
                "Unknown interval '{other}' (expected daily or weekly)"
            ))),
        }
    }
}

/// A domain registered for scheduled re-crawls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DomainRecord {
    /// Seed URL the crawl starts from
    pub url: String,

    /// Registry key: lowercased host without `www.` prefix
    pub domain: String,

    /// Page budget for this domain's crawls
    pub max_pages: usize,

    /// Refresh cadence
    pub interval: RefreshInterval,

    /// When the domain was last crawled successfully
    pub last_crawled: Option<DateTime<Utc>>,

    /// Page count of the last successful crawl
    pub page_count: usize,

    /// When the domain was registered
    pub registered_at: DateTime<Utc>,
}

impl DomainRecord {
    /// Whether the refresh interval has elapsed since the last crawl.
    /// Never-crawled records are always due.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_crawled {
            Some(last) => now - last >= self.interval.period(),
            None => true,
        }
    }
}

/// Update one record's crawl metadata, returning the new list.
///
/// Records not matching `domain` pass through untouched; an unknown domain
/// leaves the list unchanged.
pub fn touch_crawl_meta(
    records: Vec<DomainRecord>,
    domain: &str,
    page_count: usize,
    at: DateTime<Utc>,
) -> Vec<DomainRecord> {
    records
        .into_iter()
        .map(|record| {
            if record.domain == domain {
                DomainRecord {
                    last_crawled: Some(at),
                    page_count,
                    ..record
                }
            } else {
                record
            }
        })
        .collect()
}

/// Remove a domain's record, returning the new list.
pub fn remove_domain(records: Vec<DomainRecord>, domain: &str) -> Vec<DomainRecord> {
    records
        .into_iter()
        .filter(|record| record.domain != domain)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_record(domain: &str) -> DomainRecord {
        DomainRecord {
            url: format!("https://{domain}"),
            domain: domain.to_string(),
            max_pages: 500,
            interval: RefreshInterval::Daily,
            last_crawled: None,
            page_count: 0,
            registered_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_interval_from_str() {
        assert_eq!(
            "daily".parse::<RefreshInterval>().unwrap(),
            RefreshInterval::Daily
        );
        assert_eq!(
            "WEEKLY".parse::<RefreshInterval>().unwrap(),
            RefreshInterval::Weekly
        );
        assert!("monthly".parse::<RefreshInterval>().is_err());
    }

    #[test]
    fn test_never_crawled_is_due() {
        let record = sample_record("example.com");
        assert!(record.is_due(Utc::now()));
    }

    #[test]
    fn test_is_due_respects_interval() {
        let mut record = sample_record("example.com");
        let crawled = Utc.with_ymd_and_hms(2026, 2, 1, 3, 0, 0).unwrap();
        record.last_crawled = Some(crawled);

        assert!(!record.is_due(crawled + Duration::hours(23)));
        assert!(record.is_due(crawled + Duration::hours(24)));

        record.interval = RefreshInterval::Weekly;
        assert!(!record.is_due(crawled + Duration::days(6)));
        assert!(record.is_due(crawled + Duration::days(7)));
    }

    #[test]
    fn test_touch_crawl_meta_updates_only_match() {
        let records = vec![sample_record("a.com"), sample_record("b.com")];
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

        let updated = touch_crawl_meta(records, "b.com", 42, at);

        assert_eq!(updated[0].last_crawled, None);
        assert_eq!(updated[0].page_count, 0);
        assert_eq!(updated[1].last_crawled, Some(at));
        assert_eq!(updated[1].page_count, 42);
    }

    #[test]
    fn test_touch_crawl_meta_unknown_domain_is_noop() {
        let records = vec![sample_record("a.com")];
        let updated = touch_crawl_meta(records.clone(), "missing.com", 9, Utc::now());
        assert_eq!(updated, records);
    }

    #[test]
    fn test_remove_domain() {
        let records = vec![sample_record("a.com"), sample_record("b.com")];
        let remaining = remove_domain(records, "a.com");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].domain, "b.com");
    }
}
