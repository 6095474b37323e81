//! Docqa library crate (used by the server binary and integration tests).
//!
//! Adaptive retrieval and question answering over a locally indexed document
//! corpus. Per query, the [`search::AdaptiveSearcher`] decides whether cheap
//! vector similarity suffices or a cross-encoder rerank pass is warranted,
//! under a bounded FIFO result cache.
//!
//! # Public API Surface
//!
//! ## Core
//! - [`AdaptiveSearcher`], [`SearchConfig`], [`SearchOutcome`],
//!   [`RetrievalStrategy`] - the per-query strategy engine
//! - [`FingerprintCache`] - bounded FIFO result cache
//! - [`ComplexityAnalyzer`] - lexical query scoring
//! - [`PoolRetriever`], [`PassageStore`], [`QdrantPassageStore`] - retrieval
//! - [`CrossEncoderReranker`], [`RerankerConfig`] - cross-encoder scoring
//!
//! ## Collaborators
//! - [`TextEmbedder`], [`EmbedderConfig`] - embedding generation
//! - [`CorpusIndexer`], [`Chunker`], [`IngestManifest`] - corpus ingestion
//! - [`ChatHistoryStore`], [`ChatMessage`] - transcript persistence
//! - [`ChatBackend`], [`OpenAiCompatBackend`] - answer generation
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod complexity;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod history;
pub mod ingest;
pub mod llm;
pub mod reranker;
pub mod retrieval;
pub mod search;

pub use cache::FingerprintCache;
pub use complexity::{COMPLEXITY_MARKERS, ComplexityAnalyzer};
pub use config::{Config, ConfigError};
pub use embedding::{EmbedderConfig, EmbeddingError, TextEmbedder};
pub use hashing::{Fingerprint, fingerprint};
pub use history::{ChatHistoryStore, ChatMessage, HistoryError, SessionSummary};
pub use ingest::{Chunker, CorpusIndexer, IngestError, IngestManifest, SourceDocument};
pub use llm::{ChatBackend, ChatBackendError, OpenAiCompatBackend};
#[cfg(any(test, feature = "mock"))]
pub use llm::MockChatBackend;
pub use reranker::{CrossEncoderReranker, ModelVariant, RerankerConfig, RerankerError};
#[cfg(any(test, feature = "mock"))]
pub use retrieval::MockPassageStore;
pub use retrieval::{
    Passage, PassageMetadata, PassageStore, PoolRetriever, QdrantPassageStore, RetrievalError,
    ScoredPassage,
};
pub use search::{AdaptiveSearcher, RetrievalStrategy, SearchConfig, SearchError, SearchOutcome};
