use sha2::{Digest, Sha256};

/// Reserved metadata key holding the fingerprint of the content a stored
/// vector was computed from.
pub const CONTENT_HASH_KEY: &str = "content_hash";

/// SHA-256 hex fingerprint of the exact byte content. Deterministic, so
/// identical content always maps to the same fingerprint regardless of
/// which writer computed it.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
