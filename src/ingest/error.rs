use std::path::PathBuf;
use thiserror::Error;

use crate::retrieval::RetrievalError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse manifest at '{path}': {source}")]
    MalformedManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize manifest: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to index passages: {0}")]
    Store(#[from] RetrievalError),

    #[error("document has no file name: {path}")]
    MissingFileName { path: PathBuf },
}
