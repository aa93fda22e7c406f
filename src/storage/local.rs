//! Local filesystem storage.
//!
//! Holds the domain registry (`domains.json`) and the per-domain feed
//! output directories. All writes are atomic (write to temp, then rename)
//! so a crashed run never leaves a truncated registry or feed behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::DomainRecord;
use crate::storage::{DomainRegistry, FeedPaths};

const DOMAINS_FILE: &str = "domains.json";
const OUTPUT_DIR: &str = "output";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Root directory of this storage.
    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    /// Output directory for one domain's feeds.
    pub fn domain_dir(&self, domain: &str) -> PathBuf {
        self.root_dir.join(OUTPUT_DIR).join(domain)
    }

    /// Write both feed documents for a domain.
    pub async fn write_feeds(&self, domain: &str, sitemap: &str, rss: &str) -> Result<FeedPaths> {
        let dir = self.domain_dir(domain);
        let paths = FeedPaths {
            sitemap: dir.join("sitemap.xml"),
            rss: dir.join("rss.xml"),
        };

        self.write_bytes(&paths.sitemap, sitemap.as_bytes()).await?;
        self.write_bytes(&paths.rss, rss.as_bytes()).await?;
        Ok(paths)
    }

    /// Remove a domain's output directory, if it exists.
    pub async fn remove_feeds(&self, domain: &str) -> Result<()> {
        let dir = self.domain_dir(domain);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.ensure_dir(path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(&self.path(key), &bytes).await
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl DomainRegistry for LocalStorage {
    async fn load(&self) -> Result<Vec<DomainRecord>> {
        Ok(self.read_json(DOMAINS_FILE).await?.unwrap_or_default())
    }

    async fn save(&self, records: &[DomainRecord]) -> Result<()> {
        self.write_json(DOMAINS_FILE, records).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;
    use crate::models::RefreshInterval;

    fn record(domain: &str) -> DomainRecord {
        DomainRecord {
            url: format!("https://{domain}"),
            domain: domain.to_string(),
            max_pages: 500,
            interval: RefreshInterval::Daily,
            last_crawled: None,
            page_count: 0,
            registered_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_registry_round_trip() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let records = vec![record("example.com"), record("other.org")];
        storage.save(&records).await.unwrap();

        let loaded = storage.load().await.unwrap();
        assert_eq!(loaded, records);
    }

    #[tokio::test]
    async fn test_empty_registry_loads_as_empty_list() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        assert!(storage.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_feeds_creates_domain_dir() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let paths = storage
            .write_feeds("example.com", "<urlset/>", "<rss/>")
            .await
            .unwrap();

        let sitemap = tokio::fs::read_to_string(&paths.sitemap).await.unwrap();
        let rss = tokio::fs::read_to_string(&paths.rss).await.unwrap();
        assert_eq!(sitemap, "<urlset/>");
        assert_eq!(rss, "<rss/>");
    }

    #[tokio::test]
    async fn test_write_feeds_overwrites_previous_output() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.write_feeds("example.com", "old", "old").await.unwrap();
        let paths = storage.write_feeds("example.com", "new", "new").await.unwrap();

        let sitemap = tokio::fs::read_to_string(&paths.sitemap).await.unwrap();
        assert_eq!(sitemap, "new");
    }

    #[tokio::test]
    async fn test_remove_feeds() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.write_feeds("example.com", "s", "r").await.unwrap();
        storage.remove_feeds("example.com").await.unwrap();
        assert!(!storage.domain_dir("example.com").exists());

        // Removing an absent domain is fine
        storage.remove_feeds("missing.com").await.unwrap();
    }
}
