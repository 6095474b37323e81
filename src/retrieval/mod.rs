//! Passage model and vector-store access.

pub mod error;
pub mod model;
pub mod retriever;
pub mod store;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::RetrievalError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockPassageStore;
pub use model::{Passage, PassageMetadata, ScoredPassage, passage_point_id};
pub use retriever::PoolRetriever;
pub use store::{PassageStore, QdrantPassageStore};

/// Default Qdrant collection holding the corpus passages.
pub const DEFAULT_COLLECTION_NAME: &str = "docqa_passages";
