//! Crawler coordinator - the traversal engine
//!
//! This module walks the same-host link graph from the base URL:
//! - Expanding pages (fetch, extract anchors, filter) as bounded concurrent tasks
//! - Recording every link target in the shared visit store
//! - Scheduling each newly seen URL for exactly one expansion
//! - Collecting per-URL failures instead of aborting the crawl
//! - Stopping early when the cancellation token fires

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{fetch_deadline, Fetcher, HttpFetcher};
use crate::crawler::parser::extract_hrefs;
use crate::crawler::store::{Observation, VisitCounts, VisitStore};
use crate::url::{filter_links, parse_base_url, RelativeLinks};
use crate::{CrawlError, SitemapError};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{Id, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use url::Url;

/// A URL whose expansion was abandoned
#[derive(Debug, Clone)]
pub struct CrawlFailure {
    /// The URL that could not be expanded
    pub url: String,

    /// Why it failed
    pub error: CrawlError,
}

/// Everything a crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The normalized base URL the crawl started from
    pub base_url: String,

    /// Link-target counts for every discovered URL
    pub visit_counts: VisitCounts,

    /// URLs whose subtrees were skipped
    pub failures: Vec<CrawlFailure>,

    /// Pages fetched and scanned successfully, the base included
    pub pages_expanded: usize,

    /// Whether the crawl was stopped before exhausting the link graph
    pub cancelled: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// True when every discovered URL was expanded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }

    /// Wall-clock duration of the crawl
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Result of one expansion task
struct Expanded {
    url: String,
    result: Result<Vec<String>, CrawlError>,
}

/// Read-only state shared by every expansion task of one crawl
struct Expansion {
    fetcher: Arc<dyn Fetcher>,
    store: Arc<VisitStore>,
    base_url: Url,
    fetch_deadline: Duration,
    relative_links: RelativeLinks,
    count_repeated_links: bool,
}

impl Expansion {
    /// Fetches a page, records its links, and returns the URLs it discovered
    /// first, in page order
    async fn discover(&self, url: &str) -> Result<Vec<String>, CrawlError> {
        let body = tokio::time::timeout(self.fetch_deadline, self.fetcher.fetch(url))
            .await
            .map_err(|_| CrawlError::Timeout {
                url: url.to_string(),
            })??;

        let hrefs = extract_hrefs(&body, url)?;
        let links = filter_links(url, &self.base_url, &hrefs, self.relative_links)?;

        let mut discovered = Vec::new();
        for link in links {
            let occurrences = if self.count_repeated_links {
                link.occurrences
            } else {
                1
            };

            match self.store.observe(&link.url, occurrences) {
                // The base was expanded as the entry point; it is counted but
                // never expanded again
                Observation::New if link.url == self.base_url.as_str() => {
                    tracing::trace!("{} links back to the base URL", url);
                }
                Observation::New => discovered.push(link.url),
                Observation::Repeat(count) => {
                    tracing::trace!("{} seen again from {} (count {})", link.url, url, count);
                }
            }
        }

        Ok(discovered)
    }
}

async fn expand(expansion: Arc<Expansion>, url: String) -> Expanded {
    let result = expansion.discover(&url).await;
    Expanded { url, result }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: CrawlerConfig,
    fetcher: Arc<dyn Fetcher>,
    cancel: CancellationToken,
}

impl Coordinator {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(SitemapError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, SitemapError> {
        let fetcher = HttpFetcher::new(config)?;
        Ok(Self::with_fetcher(config.crawler.clone(), Arc::new(fetcher)))
    }

    /// Creates a coordinator around any [`Fetcher`]
    pub fn with_fetcher(config: CrawlerConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            fetcher,
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the cancellation token, e.g. with one shared with a signal handler
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns a handle that stops the crawl when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Crawls from `base_url` until no unexpanded URL remains
    ///
    /// Work is taken from a LIFO stack, so with one concurrent fetch the walk
    /// is depth-first. Up to `max-concurrent-fetches` expansions run at once.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Counts plus any per-URL failures
    /// * `Err(SitemapError::InvalidBaseUrl)` - The base URL is unusable; nothing was fetched
    /// * `Err(SitemapError::BaseUnreachable)` - The base page itself could not be expanded
    pub async fn run(&self, base_url: &str) -> Result<CrawlReport, SitemapError> {
        let base = parse_base_url(base_url)?;
        let base_key = base.as_str().to_string();
        let started_at = Utc::now();
        let max_tasks = self.config.max_concurrent_fetches.max(1) as usize;

        tracing::info!(
            "Starting crawl of {} ({} concurrent fetches)",
            base_key,
            max_tasks
        );

        let store = Arc::new(VisitStore::new());
        let expansion = Arc::new(Expansion {
            fetcher: Arc::clone(&self.fetcher),
            store: Arc::clone(&store),
            base_url: base,
            fetch_deadline: fetch_deadline(&self.config),
            relative_links: self.config.relative_links,
            count_repeated_links: self.config.count_repeated_links,
        });

        let mut stack = vec![base_key.clone()];
        let mut tasks: JoinSet<Expanded> = JoinSet::new();
        let mut in_flight: HashMap<Id, String> = HashMap::new();
        let mut failures = Vec::new();
        let mut pages_expanded = 0;
        let mut cancelled = false;

        loop {
            while tasks.len() < max_tasks {
                let Some(url) = stack.pop() else { break };
                tracing::debug!("Expanding {}", url);
                let handle = tasks.spawn(expand(Arc::clone(&expansion), url.clone()));
                in_flight.insert(handle.id(), url);
            }

            if tasks.is_empty() {
                tracing::info!("No URLs left to expand, crawl complete");
                break;
            }

            let joined = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                joined = tasks.join_next_with_id() => joined,
            };

            let Some(joined) = joined else {
                tracing::warn!("Crawl cancelled with {} expansions in flight", tasks.len());
                tasks.abort_all();
                cancelled = true;
                break;
            };

            let expanded = match joined {
                Ok((id, expanded)) => {
                    in_flight.remove(&id);
                    expanded
                }
                Err(e) => {
                    let Some(url) = in_flight.remove(&e.id()) else {
                        tracing::error!("Expansion task failed: {}", e);
                        continue;
                    };
                    tracing::error!("Expansion of {} failed: {}", url, e);
                    Expanded {
                        result: Err(CrawlError::Panicked {
                            url: url.clone(),
                            message: panic_message(e),
                        }),
                        url,
                    }
                }
            };

            match expanded.result {
                Ok(discovered) => {
                    pages_expanded += 1;
                    tracing::debug!(
                        "{} yielded {} new URLs",
                        expanded.url,
                        discovered.len()
                    );
                    // Reversed so the first link on the page is expanded first
                    stack.extend(discovered.into_iter().rev());

                    if pages_expanded % 50 == 0 {
                        tracing::info!(
                            "Progress: {} pages expanded, {} URLs discovered, {} pending",
                            pages_expanded,
                            store.len(),
                            stack.len() + tasks.len()
                        );
                    }
                }
                Err(error) if expanded.url == base_key => {
                    return Err(SitemapError::BaseUnreachable {
                        url: expanded.url,
                        source: error,
                    });
                }
                Err(error) => {
                    tracing::warn!("Skipping {}: {}", expanded.url, error);
                    failures.push(CrawlFailure {
                        url: expanded.url,
                        error,
                    });
                }
            }
        }

        Ok(CrawlReport {
            base_url: base_key,
            visit_counts: store.snapshot(),
            failures,
            pages_expanded,
            cancelled,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

/// Extracts the message a panicking task was unwound with
fn panic_message(error: JoinError) -> String {
    if !error.is_panic() {
        return error.to_string();
    }

    let payload = error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "task panicked".to_string()
    }
}

/// Runs a complete crawl over HTTP
///
/// # Example
///
/// ```no_run
/// use sitemap_ripple::config::Config;
/// use sitemap_ripple::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(&Config::default(), "https://example.com/").await?;
/// println!("{} URLs discovered", report.visit_counts.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, base_url: &str) -> Result<CrawlReport, SitemapError> {
    Coordinator::new(config)?.run(base_url).await
}
