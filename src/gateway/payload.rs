use serde::{Deserialize, Serialize};

use crate::history::SessionSummary;
use crate::retrieval::Passage;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,

    /// Continues an existing conversation; omitted starts a new one.
    #[serde(default)]
    pub session_id: Option<String>,

    /// Overrides the server's default passage count.
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub session_id: String,
    pub strategy: String,
    pub passages: Vec<PassageView>,
}

/// Flattened passage representation for API responses.
#[derive(Debug, Serialize)]
pub struct PassageView {
    pub content: String,
    pub source: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<u32>,
    pub relevance_score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rerank_score: Option<f32>,
}

impl From<Passage> for PassageView {
    fn from(p: Passage) -> Self {
        Self {
            content: p.content,
            source: p.metadata.source,
            file_name: p.metadata.file_name,
            page: p.metadata.page,
            chunk_index: p.metadata.chunk_index,
            relevance_score: p.relevance_score,
            rerank_score: p.rerank_score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionSummary>,
}
