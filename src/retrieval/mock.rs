use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::RwLock;

use super::error::RetrievalError;
use super::model::{Passage, ScoredPassage};
use super::store::PassageStore;

/// In-memory store with canned search results and injectable failures.
///
/// Results are returned in the order they were configured (highest relevance
/// first, as a real store would); `search` honors `limit` by truncation.
#[derive(Default)]
pub struct MockPassageStore {
    results: RwLock<Vec<ScoredPassage>>,
    added: RwLock<Vec<Passage>>,
    fail_search: AtomicBool,
    search_calls: AtomicUsize,
}

impl MockPassageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that serves the given results, best first.
    pub fn with_results(results: Vec<ScoredPassage>) -> Self {
        let store = Self::new();
        store.set_results(results);
        store
    }

    /// Replaces the canned search results.
    pub fn set_results(&self, results: Vec<ScoredPassage>) {
        *self.results.write() = results;
    }

    /// Makes subsequent `search` calls fail with a `SearchFailed` error.
    pub fn fail_search(&self, fail: bool) {
        self.fail_search.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of `search` invocations so far.
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Returns every passage passed to `add`.
    pub fn added_passages(&self) -> Vec<Passage> {
        self.added.read().clone()
    }
}

impl PassageStore for MockPassageStore {
    async fn add(&self, passages: Vec<Passage>) -> Result<usize, RetrievalError> {
        let count = passages.len();
        self.added.write().extend(passages);
        Ok(count)
    }

    async fn search(
        &self,
        _query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredPassage>, RetrievalError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_search.load(Ordering::SeqCst) {
            return Err(RetrievalError::SearchFailed {
                collection: "mock".to_string(),
                message: "injected failure".to_string(),
            });
        }

        let mut results = self.results.read().clone();
        results.truncate(limit);
        Ok(results)
    }
}
