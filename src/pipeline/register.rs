// src/pipeline/register.rs

//! Domain registry operations: register, remove, list.

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{DomainRecord, RefreshInterval, remove_domain};
use crate::storage::{DomainRegistry, LocalStorage};
use crate::utils::url::{domain_key, host_key};

/// Register a domain for scheduled re-crawls.
///
/// The registry key is the URL's lowercased, `www.`-stripped host.
/// Registering an already-present domain is an error.
pub async fn run_register(
    storage: &LocalStorage,
    url: &str,
    interval: RefreshInterval,
    max_pages: usize,
) -> Result<DomainRecord> {
    let url = url.trim();
    let parsed = url::Url::parse(url)?;
    if parsed.host_str().is_none() {
        return Err(AppError::validation(format!("URL has no host: {url}")));
    }
    let domain = domain_key(url)
        .ok_or_else(|| AppError::validation(format!("Cannot derive a domain from {url}")))?;
    if max_pages == 0 {
        return Err(AppError::validation("Page budget must be positive"));
    }

    let mut records = storage.load().await?;
    if records.iter().any(|r| r.domain == domain) {
        return Err(AppError::validation(format!(
            "Domain already registered: {domain}"
        )));
    }

    let record = DomainRecord {
        url: url.to_string(),
        domain,
        max_pages,
        interval,
        last_crawled: None,
        page_count: 0,
        registered_at: Utc::now(),
    };
    records.push(record.clone());
    storage.save(&records).await?;

    log::info!("Registered {} ({})", record.domain, record.interval.as_str());
    Ok(record)
}

/// Remove a domain and its generated feeds.
///
/// Returns whether the domain was present.
pub async fn run_remove(storage: &LocalStorage, domain: &str) -> Result<bool> {
    let domain = host_key(domain.trim());

    let records = storage.load().await?;
    let existed = records.iter().any(|r| r.domain == domain);
    let remaining = remove_domain(records, &domain);
    storage.save(&remaining).await?;
    storage.remove_feeds(&domain).await?;

    if existed {
        log::info!("Removed {domain}");
    } else {
        log::warn!("Domain not registered: {domain}");
    }
    Ok(existed)
}

/// List all registered domains.
pub async fn run_list(storage: &LocalStorage) -> Result<Vec<DomainRecord>> {
    storage.load().await
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_register_and_list() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let record = run_register(
            &storage,
            "https://www.Example.com/start",
            RefreshInterval::Daily,
            100,
        )
        .await
        .unwrap();

        assert_eq!(record.domain, "example.com");
        assert_eq!(record.max_pages, 100);
        assert!(record.last_crawled.is_none());

        let listed = run_list(&storage).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].url, "https://www.Example.com/start");
    }

    #[tokio::test]
    async fn test_register_duplicate_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        run_register(&storage, "https://example.com", RefreshInterval::Daily, 10)
            .await
            .unwrap();
        let result = run_register(
            &storage,
            "https://www.example.com/other",
            RefreshInterval::Weekly,
            10,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(run_list(&storage).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_url() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        assert!(
            run_register(&storage, "not a url", RefreshInterval::Daily, 10)
                .await
                .is_err()
        );
        assert!(
            run_register(&storage, "https://example.com", RefreshInterval::Daily, 0)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_remove_deletes_record_and_feeds() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        run_register(&storage, "https://example.com", RefreshInterval::Daily, 10)
            .await
            .unwrap();
        storage.write_feeds("example.com", "s", "r").await.unwrap();

        let existed = run_remove(&storage, "example.com").await.unwrap();
        assert!(existed);
        assert!(run_list(&storage).await.unwrap().is_empty());
        assert!(!storage.domain_dir("example.com").exists());
    }

    #[tokio::test]
    async fn test_remove_absent_domain_reports_false() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        assert!(!run_remove(&storage, "missing.com").await.unwrap());
    }
}
