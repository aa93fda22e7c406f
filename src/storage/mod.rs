//! Storage abstractions for the domain registry and feed output.
//!
//! ## Directory Layout
//!
//! ```text
//! {root}/
//! ├── config.toml           # Optional configuration
//! ├── domains.json          # Registered domains
//! └── output/               # Generated feeds
//!     └── {domain}/
//!         ├── sitemap.xml
//!         └── rss.xml
//! ```

pub mod local;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::DomainRecord;

// Re-export for convenience
pub use local::LocalStorage;

/// Paths of the feed files written for one domain.
#[derive(Debug, Clone)]
pub struct FeedPaths {
    pub sitemap: PathBuf,
    pub rss: PathBuf,
}

/// Repository seam for the registered-domain list.
///
/// The registry is read and written as a whole; record updates are pure
/// transforms over the loaded list.
#[async_trait]
pub trait DomainRegistry: Send + Sync {
    /// Load all registered domains (empty when none are registered yet).
    async fn load(&self) -> Result<Vec<DomainRecord>>;

    /// Persist the full domain list.
    async fn save(&self, records: &[DomainRecord]) -> Result<()>;
}
