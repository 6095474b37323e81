//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants from primary ones to avoid drift.

/// Number of candidates fetched from the vector store per query, regardless of
/// the caller's `k`. Callers asking for more than this may receive fewer
/// results than requested; the pool is deliberately not widened.
pub const RETRIEVAL_POOL_SIZE: usize = 10;

/// Relevance score substituted when the backing store does not expose scores.
pub const NEUTRAL_RELEVANCE_SCORE: f32 = 0.5;

/// Minimum relevance score for a candidate to count as high-confidence.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.75;

/// Complexity score above which reranking is always triggered.
pub const DEFAULT_COMPLEXITY_THRESHOLD: u32 = 8;

/// Bonus added to the complexity score per matched marker phrase.
pub const COMPLEXITY_MARKER_BONUS: u32 = 3;

/// Maximum entries held by the fingerprint cache before FIFO eviction.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Candidates per rerank batch; pools larger than this are scored in parallel.
pub const RERANK_BATCH_SIZE: usize = 5;

/// Concurrent workers for parallel batch reranking.
pub const RERANK_WORKERS: usize = 2;

/// Default number of passages returned to the caller.
pub const DEFAULT_TOP_K: usize = 5;

/// Output dimension of the default embedding model.
pub const DEFAULT_EMBEDDING_DIM: usize = 1024;

/// Embedding dimension as `u64` for Qdrant collection parameters.
pub const DEFAULT_VECTOR_SIZE_U64: u64 = DEFAULT_EMBEDDING_DIM as u64;

/// Most recent conversation turns forwarded to the model backend.
pub const HISTORY_WINDOW: usize = 6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_covers_two_batches() {
        assert_eq!(RETRIEVAL_POOL_SIZE, 2 * RERANK_BATCH_SIZE);
    }

    #[test]
    fn test_top_k_within_pool() {
        assert!(DEFAULT_TOP_K <= RETRIEVAL_POOL_SIZE);
    }

    #[test]
    fn test_vector_size_matches_dim() {
        assert_eq!(DEFAULT_VECTOR_SIZE_U64, DEFAULT_EMBEDDING_DIM as u64);
    }
}
