use super::*;
use crate::retrieval::{Passage, PassageMetadata};

fn passage(content: &str) -> Passage {
    Passage::new(
        content,
        PassageMetadata::new("corpus/doc.pdf", "doc.pdf").with_chunk_index(0),
    )
}

#[test]
fn test_get_returns_what_was_put() {
    let mut cache = FingerprintCache::new();
    let results = vec![passage("first"), passage("second")];

    cache.put("một câu hỏi", results.clone());

    assert_eq!(cache.get("một câu hỏi"), Some(results));
}

#[test]
fn test_miss_on_unknown_query() {
    let mut cache = FingerprintCache::new();
    assert_eq!(cache.get("never stored"), None);
}

#[test]
fn test_raw_key_no_normalization() {
    let mut cache = FingerprintCache::new();
    cache.put("Query", vec![passage("a")]);

    // Case and trailing-whitespace variants are independent keys.
    assert_eq!(cache.get("query"), None);
    assert_eq!(cache.get("Query "), None);
    assert!(cache.get("Query").is_some());
}

#[test]
fn test_fifo_evicts_exactly_the_first_inserted() {
    let mut cache = FingerprintCache::with_capacity(3);

    cache.put("q1", vec![passage("r1")]);
    cache.put("q2", vec![passage("r2")]);
    cache.put("q3", vec![passage("r3")]);
    cache.put("q4", vec![passage("r4")]);

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get("q1"), None);
    assert!(cache.get("q2").is_some());
    assert!(cache.get("q3").is_some());
    assert!(cache.get("q4").is_some());
}

#[test]
fn test_eviction_ignores_access_recency() {
    let mut cache = FingerprintCache::with_capacity(2);

    cache.put("old", vec![passage("r")]);
    cache.put("newer", vec![passage("r")]);

    // Reading "old" must not protect it; this is FIFO, not LRU.
    assert!(cache.get("old").is_some());
    cache.put("newest", vec![passage("r")]);

    assert_eq!(cache.get("old"), None);
    assert!(cache.get("newer").is_some());
}

#[test]
fn test_reinsert_keeps_original_position() {
    let mut cache = FingerprintCache::with_capacity(2);

    cache.put("a", vec![passage("v1")]);
    cache.put("b", vec![passage("v1")]);
    cache.put("a", vec![passage("v2")]);

    // "a" keeps its slot at the front of the eviction order.
    cache.put("c", vec![passage("v1")]);

    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("b"), Some(vec![passage("v1")]));
    assert_eq!(cache.get("c"), Some(vec![passage("v1")]));
}

#[test]
fn test_evict_oldest_is_first_class() {
    let mut cache = FingerprintCache::with_capacity(10);
    cache.put("a", vec![passage("ra")]);
    cache.put("b", vec![passage("rb")]);

    let (key, value) = cache.evict_oldest().expect("cache is non-empty");
    assert_eq!(key, crate::hashing::fingerprint("a"));
    assert_eq!(value, vec![passage("ra")]);
    assert_eq!(cache.len(), 1);

    cache.evict_oldest();
    assert!(cache.evict_oldest().is_none());
    assert!(cache.is_empty());
}

#[test]
fn test_malformed_entry_reads_as_miss_and_is_dropped() {
    let mut cache = FingerprintCache::new();

    let oversized: Vec<Passage> = (0..RETRIEVAL_POOL_SIZE + 1)
        .map(|i| passage(&format!("r{i}")))
        .collect();
    cache.insert_raw("corrupt", oversized);

    assert_eq!(cache.get("corrupt"), None);
    assert!(!cache.contains("corrupt"));

    // Next computation can overwrite cleanly.
    cache.put("corrupt", vec![passage("fresh")]);
    assert_eq!(cache.get("corrupt"), Some(vec![passage("fresh")]));
}

#[test]
fn test_clear() {
    let mut cache = FingerprintCache::new();
    cache.put("a", vec![passage("r")]);
    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.get("a"), None);
}

#[test]
#[should_panic(expected = "capacity must be positive")]
fn test_zero_capacity_rejected() {
    let _ = FingerprintCache::with_capacity(0);
}
