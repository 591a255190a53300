//! Crawler module for page fetching and link traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Anchor extraction from HTML
//! - The shared visit-count store
//! - Overall traversal coordination

mod coordinator;
mod fetcher;
mod parser;
mod store;

pub use coordinator::{run_crawl, Coordinator, CrawlFailure, CrawlReport};
pub use fetcher::{build_http_client, fetch_deadline, Fetcher, HttpFetcher};
pub use parser::extract_hrefs;
pub use store::{Observation, VisitCounts, VisitStore};

use crate::config::Config;
use crate::SitemapError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the base URL
/// 2. Build the HTTP client
/// 3. Expand the base page and every same-host URL reachable from it
/// 4. Return the visit counts and any per-URL failures
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `base_url` - Where the crawl starts; also fixes the host being mapped
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished (possibly with skipped URLs)
/// * `Err(SitemapError)` - Crawl could not start or the base page failed
pub async fn crawl(config: &Config, base_url: &str) -> Result<CrawlReport, SitemapError> {
    run_crawl(config, base_url).await
}
