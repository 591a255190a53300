//! Shared visit-count store
//!
//! Every expansion task records the links it finds here. The check for
//! "already seen" and the insert or increment happen under one lock, so two
//! pages discovering the same URL at the same time produce exactly one
//! expansion.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// URL → number of times it was observed as a link target
pub type VisitCounts = HashMap<String, u32>;

/// Result of recording a link target
///
/// A URL moves from unvisited to visited exactly once, on the observation
/// that returns [`Observation::New`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// First sighting; the caller owns the URL's expansion
    New,

    /// Already known; carries the updated count
    Repeat(u32),
}

/// Mutex-guarded visit counts shared by all expansion tasks
#[derive(Debug, Default)]
pub struct VisitStore {
    counts: Mutex<VisitCounts>,
}

impl VisitStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `occurrences` sightings of `url` as a link target
    ///
    /// A URL not yet present is inserted with `occurrences` (at least 1) and
    /// reported as [`Observation::New`]; otherwise its count grows.
    pub fn observe(&self, url: &str, occurrences: u32) -> Observation {
        let occurrences = occurrences.max(1);
        let mut counts = self.lock();

        match counts.get_mut(url) {
            Some(count) => {
                *count = count.saturating_add(occurrences);
                Observation::Repeat(*count)
            }
            None => {
                counts.insert(url.to_string(), occurrences);
                Observation::New
            }
        }
    }

    /// Returns the current count of a URL, if it has been seen
    pub fn count(&self, url: &str) -> Option<u32> {
        self.lock().get(url).copied()
    }

    /// Number of distinct URLs seen
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no URL has been seen
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copies the current counts
    pub fn snapshot(&self) -> VisitCounts {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, VisitCounts> {
        // Counts stay consistent even if a holder panicked mid-update
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
