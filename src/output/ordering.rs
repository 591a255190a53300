//! Sitemap entry ordering

use crate::output::priority::PriorityMap;
use std::cmp::Ordering;

/// One `<url>` element of the sitemap
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// The page URL
    pub loc: String,

    /// Normalized priority in `[0.0, 1.0]`
    pub priority: f64,
}

impl SitemapEntry {
    /// The priority as written to the sitemap: five fractional digits
    pub fn priority_text(&self) -> String {
        format!("{:.5}", self.priority)
    }
}

/// Orders URLs by descending priority
///
/// The order is total: URLs with the same priority are listed in ascending
/// lexicographic order, so the same crawl always yields the same document.
///
/// # Examples
///
/// ```
/// use sitemap_ripple::output::{order_by_priority_descending, PriorityMap};
///
/// let mut priorities = PriorityMap::new();
/// priorities.insert("https://site.test/b".to_string(), 0.5);
/// priorities.insert("https://site.test/a".to_string(), 0.5);
/// priorities.insert("https://site.test/top".to_string(), 1.0);
///
/// let locs: Vec<String> = order_by_priority_descending(&priorities)
///     .into_iter()
///     .map(|entry| entry.loc)
///     .collect();
/// assert_eq!(
///     locs,
///     vec![
///         "https://site.test/top",
///         "https://site.test/a",
///         "https://site.test/b",
///     ]
/// );
/// ```
pub fn order_by_priority_descending(priorities: &PriorityMap) -> Vec<SitemapEntry> {
    let mut entries: Vec<SitemapEntry> = priorities
        .iter()
        .map(|(loc, &priority)| SitemapEntry {
            loc: loc.clone(),
            priority,
        })
        .collect();
    entries.sort_by(by_priority_then_url);
    entries
}

// Highest priority first; equal priorities by URL ascending, byte-wise
fn by_priority_then_url(a: &SitemapEntry, b: &SitemapEntry) -> Ordering {
    b.priority
        .total_cmp(&a.priority)
        .then_with(|| a.loc.cmp(&b.loc))
}
