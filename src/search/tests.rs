use super::*;
use crate::reranker::RerankerConfig;
use crate::retrieval::{MockPassageStore, Passage, PassageMetadata, ScoredPassage};

fn scored(content: &str, score: f32) -> ScoredPassage {
    ScoredPassage::new(
        Passage::new(content, PassageMetadata::new("corpus/doc.pdf", "doc.pdf")),
        Some(score),
    )
}

/// Ten confident candidates, best first.
fn confident_pool() -> Vec<ScoredPassage> {
    (0..10)
        .map(|i| scored(&format!("passage {i}"), 0.95 - i as f32 * 0.01))
        .collect()
}

// 8 whitespace tokens, no marker phrases: complexity exactly at the default
// threshold of 8, which must NOT trigger reranking on its own.
const AT_THRESHOLD_QUERY: &str = "alpha beta gamma delta epsilon zeta eta theta";

// 9 tokens: one past the threshold, always reranks.
const PAST_THRESHOLD_QUERY: &str = "alpha beta gamma delta epsilon zeta eta theta iota";

fn searcher_with(results: Vec<ScoredPassage>) -> AdaptiveSearcher<MockPassageStore> {
    AdaptiveSearcher::new(MockPassageStore::with_results(results), SearchConfig::default())
}

#[tokio::test]
async fn test_fast_path_on_confident_simple_query() {
    let searcher = searcher_with(confident_pool());

    let outcome = searcher.search("A là gì?", 5).await.unwrap();

    assert_eq!(outcome.strategy, RetrievalStrategy::FastPath);
    assert_eq!(outcome.passages.len(), 5);
    // Original relevance order preserved, no rerank scores attached.
    for (i, passage) in outcome.passages.iter().enumerate() {
        assert_eq!(passage.content, format!("passage {i}"));
        assert!(passage.rerank_score.is_none());
    }
}

#[tokio::test]
async fn test_cache_hit_determinism() {
    let searcher = searcher_with(confident_pool());

    let first = searcher.search("một câu hỏi", 5).await.unwrap();
    let second = searcher.search("một câu hỏi", 5).await.unwrap();

    assert_eq!(second.strategy, RetrievalStrategy::CacheHit);
    assert_eq!(first.passages, second.passages);
    // The second call never touched the store.
    assert_eq!(searcher.store().search_calls(), 1);
}

#[tokio::test]
async fn test_cache_hit_respects_smaller_k() {
    let searcher = searcher_with(confident_pool());

    let first = searcher.search("q", 5).await.unwrap();
    let second = searcher.search("q", 3).await.unwrap();

    assert_eq!(second.strategy, RetrievalStrategy::CacheHit);
    assert_eq!(second.passages, first.passages[..3]);
}

#[tokio::test]
async fn test_fifo_eviction_triggers_recomputation() {
    let store = MockPassageStore::with_results(confident_pool());
    let config = SearchConfig::default().with_cache_capacity(2);
    let searcher = AdaptiveSearcher::new(store, config);

    searcher.search("q1", 5).await.unwrap();
    searcher.search("q2", 5).await.unwrap();
    searcher.search("q3", 5).await.unwrap(); // evicts q1

    assert_eq!(searcher.cache_len(), 2);
    assert_eq!(searcher.store().search_calls(), 3);

    let again = searcher.search("q1", 5).await.unwrap();
    assert_ne!(again.strategy, RetrievalStrategy::CacheHit);
    assert_eq!(searcher.store().search_calls(), 4);
}

#[tokio::test]
async fn test_complexity_at_threshold_takes_fast_path() {
    let searcher = searcher_with(confident_pool());

    let outcome = searcher.search(AT_THRESHOLD_QUERY, 5).await.unwrap();

    assert_eq!(outcome.strategy, RetrievalStrategy::FastPath);
}

#[tokio::test]
async fn test_complexity_past_threshold_always_reranks() {
    // All candidates are high-confidence, so only complexity forces the
    // rerank here.
    let searcher = searcher_with(confident_pool());

    let outcome = searcher.search(PAST_THRESHOLD_QUERY, 5).await.unwrap();

    assert_eq!(outcome.strategy, RetrievalStrategy::Reranked);
    assert!(outcome.passages.iter().all(|p| p.rerank_score.is_some()));
}

#[tokio::test]
async fn test_low_confidence_triggers_rerank() {
    let weak_pool: Vec<ScoredPassage> = (0..10)
        .map(|i| scored(&format!("passage {i}"), 0.5 - i as f32 * 0.01))
        .collect();
    let searcher = searcher_with(weak_pool);

    let outcome = searcher.search("ngắn gọn", 5).await.unwrap();

    assert_eq!(outcome.strategy, RetrievalStrategy::Reranked);
}

#[tokio::test]
async fn test_reranked_results_sorted_by_rerank_score() {
    let searcher = searcher_with(confident_pool());

    let outcome = searcher.search(PAST_THRESHOLD_QUERY, 10).await.unwrap();

    let scores: Vec<f32> = outcome
        .passages
        .iter()
        .map(|p| p.rerank_score.unwrap())
        .collect();
    for pair in scores.windows(2) {
        assert!(pair[0] >= pair[1], "rerank scores not descending: {scores:?}");
    }
}

#[tokio::test]
async fn test_rerank_order_independent_of_batching() {
    // Vary lexical overlap with the query so the stub scorer discriminates.
    let pool: Vec<ScoredPassage> = (0..10)
        .map(|i| {
            let content = format!(
                "tài liệu số {} nói về {}",
                i,
                if i % 3 == 0 { "canh tác lúa nước" } else { "chủ đề khác" }
            );
            scored(&content, 0.6)
        })
        .collect();
    let query = "kỹ thuật canh tác lúa nước là gì và áp dụng ra sao";

    let parallel = AdaptiveSearcher::new(
        MockPassageStore::with_results(pool.clone()),
        SearchConfig::default().with_rerank_batch_size(5),
    );
    let sequential = AdaptiveSearcher::new(
        MockPassageStore::with_results(pool),
        SearchConfig::default().with_rerank_batch_size(100),
    );

    let a = parallel.search(query, 5).await.unwrap();
    let b = sequential.search(query, 5).await.unwrap();

    assert_eq!(a.strategy, RetrievalStrategy::Reranked);
    assert_eq!(b.strategy, RetrievalStrategy::Reranked);

    let order_a: Vec<&str> = a.passages.iter().map(|p| p.content.as_str()).collect();
    let order_b: Vec<&str> = b.passages.iter().map(|p| p.content.as_str()).collect();
    assert_eq!(order_a, order_b);
}

#[tokio::test]
async fn test_result_cap_never_exceeds_available() {
    let small_pool: Vec<ScoredPassage> =
        (0..3).map(|i| scored(&format!("p{i}"), 0.9)).collect();
    let searcher = searcher_with(small_pool);

    let outcome = searcher.search("anything here", 7).await.unwrap();

    assert_eq!(outcome.passages.len(), 3);
}

#[tokio::test]
async fn test_reranker_construction_failure_degrades_gracefully() {
    let config = SearchConfig::default()
        .with_reranker(RerankerConfig::new("/nonexistent/reranker/model"));
    let searcher = AdaptiveSearcher::new(
        MockPassageStore::with_results(confident_pool()),
        config,
    );

    let outcome = searcher.search(PAST_THRESHOLD_QUERY, 5).await.unwrap();

    assert_eq!(outcome.strategy, RetrievalStrategy::RerankFallback);
    assert_eq!(outcome.passages.len(), 5);
    // Retrieval order, no rerank scores.
    for (i, passage) in outcome.passages.iter().enumerate() {
        assert_eq!(passage.content, format!("passage {i}"));
        assert!(passage.rerank_score.is_none());
    }
}

#[tokio::test]
async fn test_retrieval_failure_propagates_and_caches_nothing() {
    let store = MockPassageStore::new();
    store.fail_search(true);
    let searcher = AdaptiveSearcher::new(store, SearchConfig::default());

    let err = searcher.search("q", 5).await.unwrap_err();
    assert!(matches!(err, SearchError::Retrieval(_)));
    assert_eq!(searcher.cache_len(), 0);

    // Once the backend recovers, the same query recomputes cleanly.
    searcher.store().fail_search(false);
    searcher.store().set_results(confident_pool());
    let outcome = searcher.search("q", 5).await.unwrap();
    assert_ne!(outcome.strategy, RetrievalStrategy::CacheHit);
    assert_eq!(outcome.passages.len(), 5);
}

#[tokio::test]
async fn test_scenario_simple_factual_query_skips_rerank() {
    // Corpus of passages about topic "A", all retrieved with score >= 0.8.
    let pool: Vec<ScoredPassage> = (0..10)
        .map(|i| scored(&format!("A is described in part {i}"), 0.88 - i as f32 * 0.005))
        .collect();
    let searcher = searcher_with(pool);

    let outcome = searcher.search("What is A?", 5).await.unwrap();

    assert_eq!(outcome.strategy, RetrievalStrategy::FastPath);
    assert_eq!(outcome.passages.len(), 5);
    for (i, passage) in outcome.passages.iter().enumerate() {
        assert_eq!(passage.content, format!("A is described in part {i}"));
    }
}

#[tokio::test]
async fn test_scenario_analytical_vietnamese_query_always_reranks() {
    // Two marker phrases push the complexity well past the threshold, so the
    // rerank fires even though every candidate is high-confidence.
    let searcher = searcher_with(confident_pool());

    let outcome = searcher
        .search("Tại sao A và B lại khác nhau về bản chất?", 5)
        .await
        .unwrap();

    assert_eq!(outcome.strategy, RetrievalStrategy::Reranked);
}

#[tokio::test]
async fn test_empty_pool_reranks_to_empty() {
    let searcher = searcher_with(vec![]);

    let outcome = searcher.search("bất kỳ câu hỏi nào", 5).await.unwrap();

    assert!(outcome.passages.is_empty());
}
