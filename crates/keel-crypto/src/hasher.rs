//! Domain-tagged BLAKE3 hashing of canonically encoded values.

use serde::Serialize;

/// Errors from canonical hashing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HashError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Hash a serializable value under a domain tag.
///
/// The value is encoded as canonical JSON (serde's deterministic field
/// order) and hashed as `BLAKE3(tag || encoding)`. Two values hash equal
/// iff their tagged encodings are identical.
pub fn hash_canonical<T: Serialize>(tag: &[u8], value: &T) -> Result<[u8; 32], HashError> {
    let encoded = serde_json::to_vec(value).map_err(|e| HashError::Serialization(e.to_string()))?;
    let mut hasher = blake3::Hasher::new();
    hasher.update(tag);
    hasher.update(&encoded);
    Ok(*hasher.finalize().as_bytes())
}
