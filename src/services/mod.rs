//! Crawling services.
//!
//! - `crawler`: breadth-first site traversal
//! - `extract`: HTML metadata and link extraction
//! - `fetch`: HTTP fetch collaborator

pub mod crawler;
pub mod extract;
pub mod fetch;

pub use crawler::SiteCrawler;
pub use extract::{Extraction, extract};
pub use fetch::{FetchedPage, HttpFetcher, PageFetcher};
