//! End-of-crawl summary
//!
//! The sitemap goes to stdout; this summary goes to the log so a reader can
//! tell a complete map from a partial one.

use crate::crawler::CrawlReport;
use tracing::{info, warn};

/// How a crawl ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// Every discovered URL was expanded
    Complete,

    /// Some subtrees were skipped after failures
    Partial { failures: usize },

    /// Stopped before the link graph was exhausted
    Cancelled,
}

impl CrawlOutcome {
    pub fn of(report: &CrawlReport) -> Self {
        if report.cancelled {
            CrawlOutcome::Cancelled
        } else if !report.failures.is_empty() {
            CrawlOutcome::Partial {
                failures: report.failures.len(),
            }
        } else {
            CrawlOutcome::Complete
        }
    }
}

/// One-line statistics for a finished crawl
pub fn summary_line(report: &CrawlReport) -> String {
    let duration = report.duration();
    format!(
        "{} URLs discovered, {} pages expanded, {} failures in {}.{:03}s",
        report.visit_counts.len(),
        report.pages_expanded,
        report.failures.len(),
        duration.num_seconds(),
        duration.num_milliseconds().rem_euclid(1000)
    )
}

/// Logs the crawl statistics and every recorded failure
///
/// # Arguments
///
/// * `report` - The finished crawl
pub fn log_summary(report: &CrawlReport) {
    info!("Crawl of {} finished: {}", report.base_url, summary_line(report));

    for failure in &report.failures {
        warn!("  skipped {}: {}", failure.url, failure.error);
    }

    match CrawlOutcome::of(report) {
        CrawlOutcome::Complete => info!("Crawl complete"),
        CrawlOutcome::Partial { failures } => warn!(
            "{} URLs could not be expanded; the sitemap may miss pages linked only from them",
            failures
        ),
        CrawlOutcome::Cancelled => warn!("Crawl was cancelled; the sitemap is partial"),
    }
}
