//! Processed-file manifest for change detection.
//!
//! A JSON map from file name to content hash and ingest metadata, persisted
//! under the data directory. A file whose hash matches its manifest entry is
//! skipped on the next corpus scan.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::IngestError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedFile {
    /// Hex-encoded BLAKE3 hash of the extracted document text.
    pub hash: String,
    pub processed_at: DateTime<Utc>,
    pub num_pages: usize,
    pub num_chunks: usize,
    #[serde(default)]
    pub scanned: bool,
}

#[derive(Debug)]
pub struct IngestManifest {
    path: PathBuf,
    files: HashMap<String, ProcessedFile>,
}

impl IngestManifest {
    /// Loads the manifest from `path`; a missing file yields an empty one.
    pub fn load<P: Into<PathBuf>>(path: P) -> Result<Self, IngestError> {
        let path = path.into();

        let files = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|source| IngestError::MalformedManifest {
                path: path.clone(),
                source,
            })?
        } else {
            HashMap::new()
        };

        Ok(Self { path, files })
    }

    /// Writes the manifest back to its path.
    pub fn save(&self) -> Result<(), IngestError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.files)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Returns `true` if `file_name` was already processed with this hash.
    pub fn is_current(&self, file_name: &str, hash: &str) -> bool {
        self.files
            .get(file_name)
            .is_some_and(|entry| entry.hash == hash)
    }

    /// Records (or replaces) the entry for a file.
    pub fn record(&mut self, file_name: &str, entry: ProcessedFile) {
        self.files.insert(file_name.to_string(), entry);
    }

    pub fn get(&self, file_name: &str) -> Option<&ProcessedFile> {
        self.files.get(file_name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
