use serde::{Deserialize, Serialize};

use crate::constants::NEUTRAL_RELEVANCE_SCORE;

/// Provenance of a passage within the source corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassageMetadata {
    /// Path of the source document.
    pub source: String,
    /// Bare file name (kept separately for display and manifest lookups).
    pub file_name: String,
    /// 1-based page number, when the extractor reported one.
    pub page: Option<u32>,
    /// Position of this chunk within the document.
    pub chunk_index: Option<u32>,
    /// `true` when the source document went through OCR.
    #[serde(default)]
    pub scanned: bool,
}

impl PassageMetadata {
    pub fn new<S: Into<String>, F: Into<String>>(source: S, file_name: F) -> Self {
        Self {
            source: source.into(),
            file_name: file_name.into(),
            page: None,
            chunk_index: None,
            scanned: false,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_chunk_index(mut self, chunk_index: u32) -> Self {
        self.chunk_index = Some(chunk_index);
        self
    }

    pub fn with_scanned(mut self, scanned: bool) -> Self {
        self.scanned = scanned;
        self
    }
}

/// A retrieved unit of text. Owned transiently by the orchestrator for the
/// duration of one query; cached copies are cloned on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub content: String,
    pub metadata: PassageMetadata,
    /// Embedding-similarity score from the vector store (or the neutral
    /// fallback when the store exposed none).
    pub relevance_score: f32,
    /// Cross-encoder score, present only after a rerank pass.
    pub rerank_score: Option<f32>,
}

impl Passage {
    pub fn new<S: Into<String>>(content: S, metadata: PassageMetadata) -> Self {
        Self {
            content: content.into(),
            metadata,
            relevance_score: NEUTRAL_RELEVANCE_SCORE,
            rerank_score: None,
        }
    }

    pub fn with_relevance_score(mut self, score: f32) -> Self {
        self.relevance_score = score;
        self
    }

    pub fn with_rerank_score(mut self, score: f32) -> Self {
        self.rerank_score = Some(score);
        self
    }
}

/// A store hit before score normalization. `score` is `None` when the backing
/// store does not expose relevance scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPassage {
    pub passage: Passage,
    pub score: Option<f32>,
}

impl ScoredPassage {
    pub fn new(passage: Passage, score: Option<f32>) -> Self {
        Self { passage, score }
    }

    /// Folds the store score into the passage, substituting the neutral score
    /// when the store reported none.
    pub fn into_passage(self) -> Passage {
        let score = self.score.unwrap_or(NEUTRAL_RELEVANCE_SCORE);
        self.passage.with_relevance_score(score)
    }
}

/// Derives a stable Qdrant point id for a passage from its provenance and
/// content. Re-ingesting an unchanged chunk overwrites its previous point.
pub fn passage_point_id(passage: &Passage) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(passage.metadata.source.as_bytes());
    hasher.update(b"|");
    hasher.update(
        &passage
            .metadata
            .chunk_index
            .unwrap_or(u32::MAX)
            .to_le_bytes(),
    );
    hasher.update(b"|");
    hasher.update(passage.content.as_bytes());

    let hash = hasher.finalize();
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}
