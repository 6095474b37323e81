use tracing::debug;

use super::error::RetrievalError;
use super::model::Passage;
use super::store::PassageStore;
use crate::constants::RETRIEVAL_POOL_SIZE;

/// Thin adapter between the orchestrator and a [`PassageStore`].
///
/// Always requests the fixed oversampling count [`RETRIEVAL_POOL_SIZE`],
/// regardless of the caller's `k`, so the rerank stage has a larger candidate
/// pool to work with. A caller asking for `k > 10` may consequently receive
/// fewer results than requested; the pool is deliberately not widened.
#[derive(Debug)]
pub struct PoolRetriever<S> {
    store: S,
}

impl<S: PassageStore> PoolRetriever<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the oversampled candidate pool in descending relevance order,
    /// with neutral scores substituted where the store exposed none.
    pub async fn fetch_candidates(&self, query: &str) -> Result<Vec<Passage>, RetrievalError> {
        let scored = self.store.search(query, RETRIEVAL_POOL_SIZE).await?;

        let mut candidates: Vec<Passage> =
            scored.into_iter().map(|sp| sp.into_passage()).collect();

        // Stores return best-first already; the stable sort enforces the
        // ordering guarantee without disturbing ties.
        candidates.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(
            candidates = candidates.len(),
            pool = RETRIEVAL_POOL_SIZE,
            "Fetched candidate pool"
        );

        Ok(candidates)
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
