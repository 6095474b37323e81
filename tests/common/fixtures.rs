use docqa::{MockPassageStore, Passage, PassageMetadata, ScoredPassage};

/// Builds a scored passage from a confident, well-indexed corpus.
pub fn scored_passage(content: &str, score: f32) -> ScoredPassage {
    ScoredPassage::new(
        Passage::new(
            content,
            PassageMetadata::new("corpus/tai-lieu.pdf", "tai-lieu.pdf"),
        ),
        Some(score),
    )
}

/// A pool of `n` candidates, best first, all above the confidence threshold.
pub fn confident_pool(n: usize) -> Vec<ScoredPassage> {
    (0..n)
        .map(|i| scored_passage(&format!("passage {i}"), 0.95 - i as f32 * 0.01))
        .collect()
}

/// A pool of `n` candidates all below the confidence threshold.
pub fn weak_pool(n: usize) -> Vec<ScoredPassage> {
    (0..n)
        .map(|i| scored_passage(&format!("passage {i}"), 0.55 - i as f32 * 0.01))
        .collect()
}

/// A mock store pre-loaded with a confident pool.
pub fn confident_store(n: usize) -> MockPassageStore {
    MockPassageStore::with_results(confident_pool(n))
}
