use std::path::PathBuf;

use crate::constants::DEFAULT_EMBEDDING_DIM;

pub const EMBEDDER_MAX_SEQ_LEN: usize = 512;

/// Embedder configuration.
///
/// `model_path` points at a Hugging Face export directory (`config.json`,
/// `model.safetensors`, `tokenizer.json`). Without one, the embedder runs in
/// stub mode and produces deterministic pseudo-embeddings for tests.
#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    pub model_path: Option<PathBuf>,

    pub embedding_dim: usize,

    pub max_seq_len: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            max_seq_len: EMBEDDER_MAX_SEQ_LEN,
        }
    }
}

impl EmbedderConfig {
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Self::default()
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn with_embedding_dim(mut self, dim: usize) -> Self {
        self.embedding_dim = dim;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.embedding_dim == 0 {
            return Err("embedding_dim cannot be zero".to_string());
        }

        if self.max_seq_len == 0 {
            return Err("max_seq_len cannot be zero".to_string());
        }

        if let Some(ref path) = self.model_path
            && path.as_os_str().is_empty()
        {
            return Err("model_path cannot be empty when provided".to_string());
        }

        Ok(())
    }

    pub fn from_env() -> Self {
        let model_path = std::env::var("DOCQA_EMBED_MODEL_PATH")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let embedding_dim = std::env::var("DOCQA_EMBED_DIM")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_EMBEDDING_DIM);

        Self {
            model_path,
            embedding_dim,
            max_seq_len: EMBEDDER_MAX_SEQ_LEN,
        }
    }

    pub fn model_available(&self) -> bool {
        self.model_path
            .as_ref()
            .is_some_and(|p| p.join("model.safetensors").is_file())
    }

    pub fn tokenizer_available(&self) -> bool {
        self.model_path
            .as_ref()
            .is_some_and(|p| p.join("tokenizer.json").is_file())
    }
}
