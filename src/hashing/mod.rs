//! Query fingerprinting for the result cache.
//!
//! Fingerprints are computed over the *raw* query string. No case folding or
//! whitespace normalization is applied, so textually distinct but semantically
//! identical queries produce distinct fingerprints and miss independently.
//! This matches the behavior of the original system and is pinned by tests;
//! changing it is a product decision, not a cleanup.

use blake3::Hasher;

/// Size in bytes of a query fingerprint (128 bits).
pub const FINGERPRINT_LEN: usize = 16;

/// A 128-bit cache key derived from a query string.
pub type Fingerprint = [u8; FINGERPRINT_LEN];

/// Computes a 128-bit fingerprint of the exact query string.
///
/// The value is the first 16 bytes of a BLAKE3 hash. 128 bits keep the
/// birthday-bound collision probability negligible for any realistic cache
/// size, and a collision costs only a wrong cache hit for one query, never
/// data corruption — the cache is bounded and entries are overwritten on
/// recomputation.
#[inline]
pub fn fingerprint(query: &str) -> Fingerprint {
    let hash = blake3::hash(query.as_bytes());
    let bytes: [u8; FINGERPRINT_LEN] = hash.as_bytes()[0..FINGERPRINT_LEN]
        .try_into()
        .expect("BLAKE3 always produces at least 16 bytes");
    bytes
}

/// Computes a full 256-bit BLAKE3 hash of a document's contents.
///
/// Used by the ingest manifest for change detection, where the full hash is
/// kept because a collision would silently skip reprocessing a changed file.
#[inline]
pub fn hash_document(bytes: &[u8]) -> [u8; 32] {
    *blake3::hash(bytes).as_bytes()
}

/// Streaming variant of [`hash_document`] for chunked readers.
#[inline]
pub fn hash_document_chunks<'a, I: IntoIterator<Item = &'a [u8]>>(chunks: I) -> [u8; 32] {
    let mut hasher = Hasher::new();
    for chunk in chunks {
        hasher.update(chunk);
    }
    *hasher.finalize().as_bytes()
}

/// Hex-encodes a hash for JSON manifests and logs.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
