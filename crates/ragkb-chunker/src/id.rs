//! Deterministic chunk identifiers.

/// Length of a chunk id in hex characters.
const ID_LEN: usize = 32;

/// Derive the stable identifier for a chunk from its source path and
/// position. The same `(source, index)` pair always yields the same id, so
/// re-indexing a document addresses the records it wrote before.
#[must_use]
pub fn chunk_id(source: &str, index: u32) -> String {
    let digest = blake3::hash(format!("{source}:{index}").as_bytes());
    digest.to_hex()[..ID_LEN].to_string()
}
