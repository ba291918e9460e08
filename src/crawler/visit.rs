use std::collections::HashSet;
use std::sync::Mutex;

/// Concurrency-safe record of which URLs have been claimed for processing.
///
/// The check and the insertion are one atomic step under the lock, so two
/// tasks racing to claim the same URL can never both win.
#[derive(Debug, Default)]
pub struct VisitGuard {
    visited: Mutex<HashSet<String>>,
}

impl VisitGuard {
    /// Create an empty guard for one crawl invocation
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a URL for processing.
    ///
    /// Returns `true` exactly once per distinct URL, for the first caller;
    /// every later caller gets `false`.
    pub fn try_claim(&self, url: &str) -> bool {
        self.visited.lock().unwrap().insert(url.to_string())
    }

    /// Number of distinct URLs claimed so far
    pub fn len(&self) -> usize {
        self.visited.lock().unwrap().len()
    }
}
