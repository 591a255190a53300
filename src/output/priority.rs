//! Priority assignment
//!
//! Priorities are the visit counts min-max scaled into `[0.0, 1.0]`.

use crate::crawler::VisitCounts;
use std::collections::HashMap;

/// URL → priority in `[0.0, 1.0]`
pub type PriorityMap = HashMap<String, f64>;

/// Priority given to every URL when all counts are equal
pub const UNIFORM_PRIORITY: f64 = 0.5;

/// Converts visit counts into normalized priorities
///
/// * No URLs → `None`; there is nothing to rank.
/// * All counts equal (including a single URL) → every priority is `0.5`.
/// * Otherwise → `(count - min) / (max - min)`, so the most linked URL gets
///   `1.0` and the least linked `0.0`.
///
/// # Examples
///
/// ```
/// use sitemap_ripple::crawler::VisitCounts;
/// use sitemap_ripple::output::assign_priorities;
///
/// let mut counts = VisitCounts::new();
/// counts.insert("https://site.test/a".to_string(), 2);
/// counts.insert("https://site.test/b".to_string(), 1);
///
/// let priorities = assign_priorities(&counts).unwrap();
/// assert_eq!(priorities["https://site.test/a"], 1.0);
/// assert_eq!(priorities["https://site.test/b"], 0.0);
/// ```
pub fn assign_priorities(counts: &VisitCounts) -> Option<PriorityMap> {
    let mut values = counts.values().copied();
    let first = values.next()?;
    let (min, max) = values.fold((first, first), |(min, max), count| {
        (min.min(count), max.max(count))
    });

    if min == max {
        return Some(
            counts
                .keys()
                .map(|url| (url.clone(), UNIFORM_PRIORITY))
                .collect(),
        );
    }

    let range = f64::from(max - min);
    Some(
        counts
            .iter()
            .map(|(url, &count)| (url.clone(), f64::from(count - min) / range))
            .collect(),
    )
}
