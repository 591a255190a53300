//! Output module for turning crawl results into a sitemap
//!
//! This module handles:
//! - Normalizing visit counts into priorities
//! - Ordering entries deterministically
//! - Writing the sitemap XML
//! - Summarizing the crawl in the log

mod ordering;
mod priority;
mod sitemap;
pub mod summary;

pub use ordering::{order_by_priority_descending, SitemapEntry};
pub use priority::{assign_priorities, PriorityMap, UNIFORM_PRIORITY};
pub use sitemap::{render_sitemap, write_sitemap, SitemapWriter, SITEMAP_XMLNS};
pub use summary::{log_summary, CrawlOutcome};

use crate::crawler::VisitCounts;

/// Builds the ordered sitemap entries for a set of visit counts
///
/// Returns `None` when there are no URLs, in which case no sitemap should be
/// emitted.
pub fn build_entries(counts: &VisitCounts) -> Option<Vec<SitemapEntry>> {
    assign_priorities(counts).map(|priorities| order_by_priority_descending(&priorities))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_entries_empty() {
        assert!(build_entries(&VisitCounts::new()).is_none());
    }

    #[test]
    fn test_build_entries_two_to_one() {
        let mut counts = VisitCounts::new();
        counts.insert("https://example.com/b".to_string(), 1);
        counts.insert("https://example.com/a".to_string(), 2);

        let entries = build_entries(&counts).unwrap();
        assert_eq!(
            entries,
            vec![
                SitemapEntry {
                    loc: "https://example.com/a".to_string(),
                    priority: 1.0,
                },
                SitemapEntry {
                    loc: "https://example.com/b".to_string(),
                    priority: 0.0,
                },
            ]
        );
    }
}
