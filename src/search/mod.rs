//! Adaptive search orchestration.
//!
//! Decides per query whether cheap embedding similarity suffices or a
//! cross-encoder rerank pass is worth its cost, under a bounded result cache.
//! Each query runs a single linear pass:
//!
//! cache check → complexity score → initial retrieve → confidence partition →
//! strategy decision → (skip-rerank | rerank) → cache store → return.
//!
//! Retrieval faults propagate to the caller; reranker faults never do — the
//! orchestrator always prefers a lower-quality answer over no answer when the
//! index itself is healthy.

pub mod config;

#[cfg(test)]
mod tests;

pub use config::SearchConfig;

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::cache::FingerprintCache;
use crate::complexity::ComplexityAnalyzer;
use crate::reranker::{CrossEncoderReranker, RerankerError};
use crate::retrieval::{Passage, PassageStore, PoolRetriever, RetrievalError};

#[derive(Debug, Error)]
pub enum SearchError {
    /// The vector index could not be queried. Not retried here.
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),
}

/// How a query's results were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetrievalStrategy {
    /// Served from the fingerprint cache.
    CacheHit,
    /// High-confidence embedding results, reranker skipped.
    FastPath,
    /// Cross-encoder reranked.
    Reranked,
    /// Rerank wanted but unavailable; raw retrieval order returned.
    RerankFallback,
}

impl RetrievalStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalStrategy::CacheHit => "CACHE_HIT",
            RetrievalStrategy::FastPath => "FAST_PATH",
            RetrievalStrategy::Reranked => "RERANKED",
            RetrievalStrategy::RerankFallback => "RERANK_FALLBACK",
        }
    }
}

impl std::fmt::Display for RetrievalStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one orchestrated query.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// At most `k` passages, best first.
    pub passages: Vec<Passage>,
    pub strategy: RetrievalStrategy,
}

/// Composes retriever, complexity analyzer, result cache and a lazily
/// constructed reranker into the per-query strategy decision.
pub struct AdaptiveSearcher<S> {
    retriever: PoolRetriever<S>,
    analyzer: ComplexityAnalyzer,
    cache: Mutex<FingerprintCache>,
    // One-time initialization; a failed load is cached as `None` so the
    // expensive construction is never retried per query.
    reranker: OnceLock<Option<Arc<CrossEncoderReranker>>>,
    config: SearchConfig,
}

impl<S> std::fmt::Debug for AdaptiveSearcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdaptiveSearcher")
            .field("cache_len", &self.cache.lock().len())
            .field("reranker_initialized", &self.reranker.get().is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl<S: PassageStore> AdaptiveSearcher<S> {
    pub fn new(store: S, config: SearchConfig) -> Self {
        Self {
            retriever: PoolRetriever::new(store),
            analyzer: ComplexityAnalyzer::new(),
            cache: Mutex::new(FingerprintCache::with_capacity(config.cache_capacity)),
            reranker: OnceLock::new(),
            config,
        }
    }

    /// Runs the adaptive strategy for one query, returning at most `k`
    /// passages (fewer when the candidate pool is smaller).
    pub async fn search(&self, query: &str, k: usize) -> Result<SearchOutcome, SearchError> {
        if let Some(mut cached) = self.cache.lock().get(query) {
            debug!(query_len = query.len(), "Serving cached results");
            cached.truncate(k);
            return Ok(SearchOutcome {
                passages: cached,
                strategy: RetrievalStrategy::CacheHit,
            });
        }

        let complexity = self.analyzer.score(query);
        debug!(complexity, "Scored query complexity");

        let candidates = self.retriever.fetch_candidates(query).await?;

        let high_confidence: Vec<Passage> = candidates
            .iter()
            .filter(|p| p.relevance_score >= self.config.confidence_threshold)
            .cloned()
            .collect();

        let needs_rerank =
            complexity > self.config.complexity_threshold || high_confidence.len() < k;

        let (passages, strategy) = if needs_rerank {
            self.rerank_candidates(query, candidates, k).await
        } else {
            debug!(
                high_confidence = high_confidence.len(),
                "High-confidence embedding results, skipping rerank"
            );
            let mut results = high_confidence;
            results.truncate(k);
            (results, RetrievalStrategy::FastPath)
        };

        self.cache.lock().put(query, passages.clone());

        info!(
            strategy = %strategy,
            complexity,
            results = passages.len(),
            "Query resolved"
        );

        Ok(SearchOutcome { passages, strategy })
    }

    /// Rescores the full candidate pool with the cross-encoder. Any reranker
    /// fault degrades to the first `k` candidates in retrieval order.
    async fn rerank_candidates(
        &self,
        query: &str,
        candidates: Vec<Passage>,
        k: usize,
    ) -> (Vec<Passage>, RetrievalStrategy) {
        let Some(reranker) = self.reranker() else {
            return (truncated(candidates, k), RetrievalStrategy::RerankFallback);
        };

        let scored = if candidates.len() > self.config.rerank_batch_size {
            debug!(
                candidates = candidates.len(),
                batch_size = self.config.rerank_batch_size,
                workers = self.config.rerank_workers,
                "Reranking in parallel batches"
            );
            self.rerank_parallel(reranker, query, &candidates).await
        } else {
            debug!(candidates = candidates.len(), "Reranking sequentially");
            rerank_batch(&reranker, query, candidates.clone())
        };

        match scored {
            Ok(mut scored) => {
                scored.sort_by(|a, b| {
                    b.rerank_score
                        .partial_cmp(&a.rerank_score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                scored.truncate(k);
                (scored, RetrievalStrategy::Reranked)
            }
            Err(e) => {
                warn!(error = %e, "Reranking failed, returning retrieval order");
                (truncated(candidates, k), RetrievalStrategy::RerankFallback)
            }
        }
    }

    /// Scores fixed-size batches on a bounded pool of blocking workers and
    /// merges the results. Merge order is irrelevant: the caller sorts by
    /// score, so the final ranking does not depend on worker scheduling.
    async fn rerank_parallel(
        &self,
        reranker: Arc<CrossEncoderReranker>,
        query: &str,
        candidates: &[Passage],
    ) -> Result<Vec<Passage>, RerankerError> {
        let semaphore = Arc::new(Semaphore::new(self.config.rerank_workers));
        let query: Arc<str> = Arc::from(query);

        let handles: Vec<_> = candidates
            .chunks(self.config.rerank_batch_size)
            .map(|batch| {
                let batch = batch.to_vec();
                let reranker = Arc::clone(&reranker);
                let query = Arc::clone(&query);
                let semaphore = Arc::clone(&semaphore);

                tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .expect("semaphore is never closed");
                    tokio::task::spawn_blocking(move || rerank_batch(&reranker, &query, batch))
                        .await
                        .map_err(|e| RerankerError::InferenceFailed {
                            reason: format!("rerank worker panicked: {e}"),
                        })?
                })
            })
            .collect();

        let mut merged = Vec::with_capacity(candidates.len());
        for result in futures_util::future::join_all(handles).await {
            let batch = result.map_err(|e| RerankerError::InferenceFailed {
                reason: format!("rerank task aborted: {e}"),
            })??;
            merged.extend(batch);
        }

        Ok(merged)
    }

    /// Returns the shared reranker, constructing it on first use. A failed
    /// construction is memoized as unavailable and logged once.
    fn reranker(&self) -> Option<Arc<CrossEncoderReranker>> {
        self.reranker
            .get_or_init(
                || match CrossEncoderReranker::load(self.config.reranker.clone()) {
                    Ok(reranker) => Some(Arc::new(reranker)),
                    Err(e) => {
                        warn!(
                            error = %e,
                            "Reranker unavailable; queries will use retrieval order"
                        );
                        None
                    }
                },
            )
            .clone()
    }

    /// Returns the number of cached queries.
    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Returns `true` once the lazy reranker slot has been initialized
    /// (successfully or as unavailable).
    pub fn reranker_initialized(&self) -> bool {
        self.reranker.get().is_some()
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Returns the underlying passage store.
    pub fn store(&self) -> &S {
        self.retriever.store()
    }
}

fn truncated(mut candidates: Vec<Passage>, k: usize) -> Vec<Passage> {
    candidates.truncate(k);
    candidates
}

fn rerank_batch(
    reranker: &CrossEncoderReranker,
    query: &str,
    batch: Vec<Passage>,
) -> Result<Vec<Passage>, RerankerError> {
    let texts: Vec<String> = batch.iter().map(|p| p.content.clone()).collect();
    let scores = reranker.score_pairs(query, &texts)?;

    Ok(batch
        .into_iter()
        .zip(scores)
        .map(|(passage, score)| passage.with_rerank_score(score))
        .collect())
}
