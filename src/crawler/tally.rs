use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

/// Shared word-count accumulator, merged into by many tasks at once.
///
/// Per-key updates happen under the lock, so concurrent merges of the same
/// word never lose increments.
#[derive(Debug, Default)]
pub struct WordAccumulator {
    counts: Mutex<HashMap<String, usize>>,
}

impl WordAccumulator {
    /// Create an empty accumulator for one crawl invocation
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every count from a page's tally into the shared totals
    pub fn merge(&self, page_counts: &HashMap<String, usize>) {
        let mut counts = self.counts.lock().unwrap();
        for (word, count) in page_counts {
            *counts.entry(word.clone()).or_insert(0) += count;
        }
    }

    /// Whether any word has been counted
    pub fn is_empty(&self) -> bool {
        self.counts.lock().unwrap().is_empty()
    }

    /// Snapshot the accumulated totals; only meaningful after all tasks
    /// have joined
    pub fn totals(&self) -> HashMap<String, usize> {
        self.counts.lock().unwrap().clone()
    }
}

/// Rank word counts by popularity and truncate to the `limit` most popular.
///
/// Ordering: count descending, ties broken by word length descending, then
/// lexicographic ascending. Re-ranking already-ranked output with the same
/// limit returns the same sequence.
pub fn rank(counts: &HashMap<String, usize>, limit: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts
        .iter()
        .map(|(word, count)| (word.clone(), *count))
        .collect();

    ranked.sort_by(|(a_word, a_count), (b_word, b_count)| {
        match b_count.cmp(a_count) {
            Ordering::Equal => {}
            other => return other,
        }
        match b_word.len().cmp(&a_word.len()) {
            Ordering::Equal => {}
            other => return other,
        }
        a_word.cmp(b_word)
    });

    ranked.truncate(limit);
    ranked
}
