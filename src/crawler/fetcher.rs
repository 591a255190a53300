//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests returning the page body as text
//! - Retry logic for transient failures
//! - Error classification

use crate::config::{Config, CrawlerConfig, UserAgentConfig};
use crate::CrawlError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Source of page bodies for the traversal engine
///
/// The HTTP implementation is [`HttpFetcher`]; tests substitute in-memory
/// page sets.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the document at `url` as text
    async fn fetch(&self, url: &str) -> Result<String, CrawlError>;
}

/// Outcome of a single request attempt
#[derive(Debug)]
enum Attempt {
    /// Final answer, success or permanent failure
    Done(Result<String, CrawlError>),

    /// Transient failure that may succeed on another attempt
    Retry(CrawlError),
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `crawler` - Timeout settings
/// * `user_agent` - The user agent configuration
///
/// # Example
///
/// ```no_run
/// use sitemap_ripple::config::Config;
/// use sitemap_ripple::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.crawler, &config.user_agent).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_millis(crawler.request_timeout_ms))
        .connect_timeout(Duration::from_millis(crawler.connect_timeout_ms))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP(S) with retries
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx | Body returned |
/// | HTTP 5xx | Retry up to `max-retries` times |
/// | Timeout | Retry up to `max-retries` times |
/// | Connection refused | Retry up to `max-retries` times |
/// | Other HTTP status | Immediate failure |
/// | Invalid request URL | Immediate failure |
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    /// Creates a fetcher from the crawl configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.crawler, &config.user_agent)?;
        Ok(Self::with_client(
            client,
            config.crawler.max_retries,
            Duration::from_millis(config.crawler.retry_delay_ms),
        ))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            client,
            max_retries,
            retry_delay,
        }
    }

    async fn attempt(&self, url: &str) -> Attempt {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return classify_request_error(url, e),
        };

        let status = response.status();
        if status.is_server_error() {
            return Attempt::Retry(CrawlError::Fetch {
                url: url.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }
        if !status.is_success() {
            return Attempt::Done(Err(CrawlError::Fetch {
                url: url.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            }));
        }

        match response.text().await {
            Ok(body) => Attempt::Done(Ok(body)),
            Err(e) => classify_request_error(url, e),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        let mut retries = 0;
        loop {
            match self.attempt(url).await {
                Attempt::Done(result) => return result,
                Attempt::Retry(error) if retries < self.max_retries => {
                    retries += 1;
                    tracing::debug!(
                        "Retrying {} ({}/{}) after: {}",
                        url,
                        retries,
                        self.max_retries,
                        error
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Attempt::Retry(error) => return Err(error),
            }
        }
    }
}

/// Sorts reqwest errors into transient and permanent failures
fn classify_request_error(url: &str, error: reqwest::Error) -> Attempt {
    if error.is_timeout() {
        Attempt::Retry(CrawlError::Timeout {
            url: url.to_string(),
        })
    } else if error.is_connect() {
        Attempt::Retry(CrawlError::Fetch {
            url: url.to_string(),
            message: format!("Connection failed: {}", error),
        })
    } else {
        Attempt::Done(Err(CrawlError::Fetch {
            url: url.to_string(),
            message: error.to_string(),
        }))
    }
}

/// Upper bound the traversal engine allows for one [`Fetcher::fetch`] call,
/// covering every attempt and the pauses between them
pub fn fetch_deadline(config: &CrawlerConfig) -> Duration {
    let request = Duration::from_millis(config.request_timeout_ms);
    let pause = Duration::from_millis(config.retry_delay_ms);
    request * (config.max_retries + 1) + pause * config.max_retries
}
