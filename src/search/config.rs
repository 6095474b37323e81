use crate::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_COMPLEXITY_THRESHOLD, DEFAULT_CONFIDENCE_THRESHOLD,
    RERANK_BATCH_SIZE, RERANK_WORKERS,
};
use crate::reranker::RerankerConfig;

/// Tunables of the adaptive search orchestrator. Fixed at construction;
/// reconfiguration means building a new searcher.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Relevance score at or above which a candidate is high-confidence.
    pub confidence_threshold: f32,

    /// Complexity score above which reranking is always triggered.
    pub complexity_threshold: u32,

    /// Fingerprint cache capacity (FIFO eviction past this).
    pub cache_capacity: usize,

    /// Candidates per rerank batch; larger pools are scored in parallel.
    pub rerank_batch_size: usize,

    /// Bounded worker count for parallel batch scoring.
    pub rerank_workers: usize,

    /// Configuration handed to the lazily constructed reranker.
    pub reranker: RerankerConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            complexity_threshold: DEFAULT_COMPLEXITY_THRESHOLD,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            rerank_batch_size: RERANK_BATCH_SIZE,
            rerank_workers: RERANK_WORKERS,
            reranker: RerankerConfig::stub(),
        }
    }
}

impl SearchConfig {
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_complexity_threshold(mut self, threshold: u32) -> Self {
        self.complexity_threshold = threshold;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_rerank_batch_size(mut self, batch_size: usize) -> Self {
        self.rerank_batch_size = batch_size;
        self
    }

    pub fn with_reranker(mut self, reranker: RerankerConfig) -> Self {
        self.reranker = reranker;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(format!(
                "confidence_threshold must be between 0.0 and 1.0, got {}",
                self.confidence_threshold
            ));
        }
        if self.cache_capacity == 0 {
            return Err("cache_capacity must be positive".to_string());
        }
        if self.rerank_batch_size == 0 {
            return Err("rerank_batch_size must be positive".to_string());
        }
        if self.rerank_workers == 0 {
            return Err("rerank_workers must be positive".to_string());
        }
        self.reranker.validate()
    }
}
