//! Sitemap-Ripple: a link-popularity sitemap generator
//!
//! This crate crawls a single website from a base URL, counts how often each
//! same-host page is linked to, and renders a sitemap whose priorities are the
//! normalized link counts.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Sitemap-Ripple operations
///
/// These are the errors that end a run. Failures while expanding a single
/// discovered URL are reported as [`CrawlError`] inside the crawl report
/// instead.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] UrlError),

    #[error("Base URL {url} could not be crawled: {source}")]
    BaseUnreachable { url: String, source: CrawlError },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while expanding one URL
#[derive(Debug, Clone, Error)]
pub enum CrawlError {
    #[error("HTTP error for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error(transparent)]
    MalformedUrl(#[from] UrlError),

    #[error("HTML parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Expansion of {url} panicked: {message}")]
    Panicked { url: String, message: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Malformed link '{href}' on {page}: {reason}")]
    Malformed {
        href: String,
        page: String,
        reason: String,
    },

    #[error("{0}")]
    InvalidBase(String),
}

/// Result type alias for Sitemap-Ripple operations
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlReport, Coordinator};
pub use output::{assign_priorities, order_by_priority_descending, render_sitemap, SitemapEntry};
pub use crate::url::{filter_links, parse_base_url, DiscoveredLink, RelativeLinks};
