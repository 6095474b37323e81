use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder,
};
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::error::RetrievalError;
use super::model::{Passage, PassageMetadata, ScoredPassage, passage_point_id};
use crate::embedding::TextEmbedder;

/// Minimal async interface the orchestrator and indexer depend on.
pub trait PassageStore: Send + Sync {
    /// Adds passages to the corpus index. Returns the number stored.
    fn add(
        &self,
        passages: Vec<Passage>,
    ) -> impl std::future::Future<Output = Result<usize, RetrievalError>> + Send;

    /// Searches for the `limit` most similar passages, best first.
    fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ScoredPassage>, RetrievalError>> + Send;
}

#[derive(Clone)]
/// Qdrant-backed passage store. Embeds text through [`TextEmbedder`] and keeps
/// passage content and provenance in point payloads.
pub struct QdrantPassageStore {
    client: Arc<Qdrant>,
    collection: String,
    embedder: Arc<TextEmbedder>,
    url: String,
}

impl QdrantPassageStore {
    /// Creates a store for `url` writing into `collection`.
    pub fn new(
        url: &str,
        collection: &str,
        embedder: Arc<TextEmbedder>,
    ) -> Result<Self, RetrievalError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| RetrievalError::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client: Arc::new(client),
            collection: collection.to_string(),
            embedder,
            url: url.to_string(),
        })
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), RetrievalError> {
        self.client
            .health_check()
            .await
            .map_err(|e| RetrievalError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Ensures the collection exists (creates it with cosine distance if
    /// missing).
    pub async fn ensure_collection(&self) -> Result<(), RetrievalError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| RetrievalError::CreateCollectionFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        if exists {
            return Ok(());
        }

        let vectors_config = VectorParamsBuilder::new(
            self.embedder.embedding_dim() as u64,
            Distance::Cosine,
        );

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(vectors_config)
                    .on_disk_payload(true),
            )
            .await
            .map_err(|e| RetrievalError::CreateCollectionFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    fn passage_to_point(&self, passage: &Passage) -> Result<PointStruct, RetrievalError> {
        let vector = self.embedder.embed(&passage.content)?;

        let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
        payload.insert("content".to_string(), passage.content.clone().into());
        payload.insert("source".to_string(), passage.metadata.source.clone().into());
        payload.insert(
            "file_name".to_string(),
            passage.metadata.file_name.clone().into(),
        );
        if let Some(page) = passage.metadata.page {
            payload.insert("page".to_string(), (page as i64).into());
        }
        if let Some(chunk_index) = passage.metadata.chunk_index {
            payload.insert("chunk_index".to_string(), (chunk_index as i64).into());
        }
        payload.insert("scanned".to_string(), passage.metadata.scanned.into());

        Ok(PointStruct::new(passage_point_id(passage), vector, payload))
    }

    fn scored_point_to_passage(
        point: qdrant_client::qdrant::ScoredPoint,
    ) -> Option<ScoredPassage> {
        let payload = point.payload;

        let content = payload.get("content").and_then(|v| v.as_str())?.to_string();
        let source = payload
            .get("source")
            .and_then(|v| v.as_str())
            .cloned()
            .unwrap_or_default()
            .to_string();
        let file_name = payload
            .get("file_name")
            .and_then(|v| v.as_str())
            .cloned()
            .unwrap_or_default()
            .to_string();

        let mut metadata = PassageMetadata::new(source, file_name);
        if let Some(page) = payload.get("page").and_then(|v| v.as_integer()) {
            metadata.page = Some(page as u32);
        }
        if let Some(chunk_index) = payload.get("chunk_index").and_then(|v| v.as_integer()) {
            metadata.chunk_index = Some(chunk_index as u32);
        }
        if let Some(scanned) = payload.get("scanned").and_then(|v| v.as_bool()) {
            metadata.scanned = scanned;
        }

        Some(ScoredPassage::new(
            Passage::new(content, metadata),
            Some(point.score),
        ))
    }
}

impl PassageStore for QdrantPassageStore {
    async fn add(&self, passages: Vec<Passage>) -> Result<usize, RetrievalError> {
        if passages.is_empty() {
            return Ok(0);
        }

        let points: Vec<PointStruct> = passages
            .iter()
            .map(|p| self.passage_to_point(p))
            .collect::<Result<_, _>>()?;

        let count = points.len();
        debug!(collection = %self.collection, count, "Upserting passages");

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| RetrievalError::UpsertFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(count)
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredPassage>, RetrievalError> {
        let query_vector = self.embedder.embed(query)?;

        let search_result = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, query_vector, limit as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| RetrievalError::SearchFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(search_result
            .result
            .into_iter()
            .filter_map(Self::scored_point_to_passage)
            .collect())
    }
}
