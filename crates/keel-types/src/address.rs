use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Hash-derived identifier uniquely and immutably naming a piece of content.
///
/// The address of a byte sequence is BLAKE3 over a domain-tagged encoding of
/// the bytes. Content is never mutated in place: writing the same bytes
/// always yields the same address, and an address can never point at
/// different content over time.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentAddress {
    hash: [u8; 32],
}

impl ContentAddress {
    /// Compute the address of a byte sequence.
    pub fn for_content(data: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"keel-content-v1:");
        hasher.update(data);
        Self {
            hash: *hasher.finalize().as_bytes(),
        }
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Full hex-encoded string with the `ca:` prefix.
    pub fn to_hex(&self) -> String {
        format!("ca:{}", hex::encode(self.hash))
    }

    /// Short identifier (first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("ca:{}", hex::encode(&self.hash[..4]))
    }

    /// Parse from a hex string (64 hex characters, optional `ca:` prefix).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("ca:").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self { hash: arr })
    }

    /// Create from a raw 32-byte hash. Use `for_content()` in production code.
    pub fn from_raw(hash: [u8; 32]) -> Self {
        Self { hash }
    }
}

impl fmt::Debug for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentAddress({})", self.short_id())
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_content_same_address() {
        let a = ContentAddress::for_content(b"hello");
        let b = ContentAddress::for_content(b"hello");
        assert_eq!(a, b);
    }

    #[test]
    fn different_content_different_address() {
        let a = ContentAddress::for_content(b"hello");
        let b = ContentAddress::for_content(b"world");
        assert_ne!(a, b);
    }

    #[test]
    fn hex_roundtrip() {
        let addr = ContentAddress::for_content(b"dataset body");
        let parsed = ContentAddress::from_hex(&addr.to_hex()).unwrap();
        assert_eq!(addr, parsed);
    }

    #[test]
    fn hex_without_prefix_parses() {
        let addr = ContentAddress::for_content(b"x");
        let bare = hex::encode(addr.as_bytes());
        assert_eq!(ContentAddress::from_hex(&bare).unwrap(), addr);
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(ContentAddress::from_hex("ca:not-hex").is_err());
        assert!(ContentAddress::from_hex("ca:abcd").is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let addr = ContentAddress::for_content(b"serde");
        let json = serde_json::to_string(&addr).unwrap();
        let parsed: ContentAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, parsed);
    }
}
