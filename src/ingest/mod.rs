//! Corpus ingestion: chunking, change detection and indexing.
//!
//! PDF text extraction and OCR happen upstream; this module consumes already
//! extracted page text (or plain `.txt` files from a corpus directory),
//! splits it into passages and pushes them into the passage store. A manifest
//! of content hashes skips unchanged files on re-scan.

pub mod chunker;
pub mod error;
pub mod manifest;


pub use chunker::Chunker;
pub use error::IngestError;
pub use manifest::{IngestManifest, ProcessedFile};

use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::hashing::{hash_document_chunks, to_hex};
use crate::retrieval::{Passage, PassageMetadata, PassageStore};

/// An extracted source document: one string per page plus provenance.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub file_name: String,
    pub pages: Vec<String>,
    /// `true` when the text came out of an OCR pass.
    pub scanned: bool,
}

impl SourceDocument {
    pub fn new<P: Into<PathBuf>>(path: P, pages: Vec<String>) -> Result<Self, IngestError> {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| IngestError::MissingFileName { path: path.clone() })?;

        Ok(Self {
            path,
            file_name,
            pages,
            scanned: false,
        })
    }

    pub fn with_scanned(mut self, scanned: bool) -> Self {
        self.scanned = scanned;
        self
    }

    /// Reads a plain-text file as a single-page document.
    pub fn from_text_file(path: &Path) -> Result<Self, IngestError> {
        let content = std::fs::read_to_string(path)?;
        Self::new(path, vec![content])
    }

    /// Hex-encoded BLAKE3 hash over all page text.
    pub fn content_hash(&self) -> String {
        to_hex(&hash_document_chunks(
            self.pages.iter().map(|p| p.as_bytes()),
        ))
    }
}

/// Summary of one corpus scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub files_indexed: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub chunks_indexed: usize,
}

/// Splits documents into passages and indexes them, tracking processed files
/// in a manifest.
pub struct CorpusIndexer<S> {
    store: S,
    chunker: Chunker,
    manifest: Mutex<IngestManifest>,
}

impl<S: PassageStore> CorpusIndexer<S> {
    pub fn new(store: S, manifest: IngestManifest) -> Self {
        Self {
            store,
            chunker: Chunker::default(),
            manifest: Mutex::new(manifest),
        }
    }

    pub fn with_chunker(mut self, chunker: Chunker) -> Self {
        self.chunker = chunker;
        self
    }

    /// Indexes one document unless its content hash matches the manifest.
    /// Returns the number of chunks indexed (0 for a skipped file).
    pub async fn ingest_document(&self, doc: &SourceDocument) -> Result<usize, IngestError> {
        let hash = doc.content_hash();

        if self.manifest.lock().is_current(&doc.file_name, &hash) {
            info!(file = %doc.file_name, "Unchanged, skipping");
            return Ok(0);
        }

        info!(file = %doc.file_name, pages = doc.pages.len(), scanned = doc.scanned, "Indexing document");

        let mut passages = Vec::new();
        let mut chunk_index: u32 = 0;
        for (page_idx, page) in doc.pages.iter().enumerate() {
            for chunk in self.chunker.split(page) {
                let metadata =
                    PassageMetadata::new(doc.path.to_string_lossy(), doc.file_name.clone())
                        .with_page(page_idx as u32 + 1)
                        .with_chunk_index(chunk_index)
                        .with_scanned(doc.scanned);
                passages.push(Passage::new(chunk, metadata));
                chunk_index += 1;
            }
        }

        let num_chunks = self.store.add(passages).await?;

        {
            let mut manifest = self.manifest.lock();
            manifest.record(
                &doc.file_name,
                ProcessedFile {
                    hash,
                    processed_at: Utc::now(),
                    num_pages: doc.pages.len(),
                    num_chunks,
                    scanned: doc.scanned,
                },
            );
            manifest.save()?;
        }

        Ok(num_chunks)
    }

    /// Scans a directory for `.txt` files (pre-extracted document text) and
    /// indexes the new or changed ones. Per-file failures are logged and
    /// counted, not fatal to the scan.
    pub async fn ingest_dir(&self, dir: &Path) -> Result<IngestStats, IngestError> {
        let mut stats = IngestStats::default();

        if !dir.exists() {
            warn!(dir = %dir.display(), "Corpus directory does not exist, nothing to ingest");
            return Ok(stats);
        }

        let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        entries.sort();

        for path in entries {
            let doc = match SourceDocument::from_text_file(&path) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Failed to read document");
                    stats.files_failed += 1;
                    continue;
                }
            };

            match self.ingest_document(&doc).await {
                Ok(0) => stats.files_skipped += 1,
                Ok(chunks) => {
                    stats.files_indexed += 1;
                    stats.chunks_indexed += chunks;
                }
                Err(e) => {
                    warn!(file = %doc.file_name, error = %e, "Failed to index document");
                    stats.files_failed += 1;
                }
            }
        }

        info!(
            indexed = stats.files_indexed,
            skipped = stats.files_skipped,
            failed = stats.files_failed,
            chunks = stats.chunks_indexed,
            "Corpus scan complete"
        );

        Ok(stats)
    }

    /// Returns the underlying passage store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
