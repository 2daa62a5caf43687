//! Ed25519 keys and signatures, in the shapes keel's log chain needs.
//!
//! The only message ever signed in keel is a 32-byte domain-tagged entry
//! hash, and the only identity an entry names is the [`ProfileId`] derived
//! from the signer's public key. Signatures travel inside JSON log exports,
//! so they serialize as hex text like the rest of keel's identifiers
//! (`ca:`/`pro:` addresses), never as byte arrays.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use keel_types::ProfileId;

/// Errors from key handling and signature checks.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature check failed")]
    InvalidSignature,
    #[error("not a valid ed25519 public key")]
    InvalidKey,
    #[error("malformed signature encoding: {0}")]
    Encoding(String),
}

/// Private half of an identity. Held only by the owner of a log.
pub struct SigningKey(ed25519_dalek::SigningKey);

impl SigningKey {
    pub fn generate() -> Self {
        let mut csprng = rand::thread_rng();
        Self(ed25519_dalek::SigningKey::generate(&mut csprng))
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(ed25519_dalek::SigningKey::from_bytes(&bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(self.0.verifying_key())
    }

    /// Sign a message, in practice always an entry hash.
    pub fn sign(&self, message: &[u8]) -> Signature {
        use ed25519_dalek::Signer;
        Signature(self.0.sign(message))
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Identify the key by the profile it derives, never by its bytes.
        write!(
            f,
            "SigningKey({})",
            self.verifying_key().to_profile_id().short_id()
        )
    }
}

/// Public half of an identity, as carried in a log's `author_key`.
#[derive(Clone, PartialEq, Eq)]
pub struct VerifyingKey(ed25519_dalek::VerifyingKey);

impl VerifyingKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, SignatureError> {
        ed25519_dalek::VerifyingKey::from_bytes(&bytes)
            .map(Self)
            .map_err(|_| SignatureError::InvalidKey)
    }

    pub fn as_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), SignatureError> {
        use ed25519_dalek::Verifier;
        self.0
            .verify(message, &signature.0)
            .map_err(|_| SignatureError::InvalidSignature)
    }

    /// The profile identity this key derives. The binding is one-way and
    /// deterministic; logs store both and verification re-checks it.
    pub fn to_profile_id(&self) -> ProfileId {
        ProfileId::from_public_key(&self.0.to_bytes())
    }
}

impl std::fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VerifyingKey({})", self.to_profile_id().short_id())
    }
}

/// An ed25519 signature over an entry hash.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(ed25519_dalek::Signature);

impl Signature {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.to_bytes())
    }

    pub fn from_hex(text: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(text).map_err(|e| SignatureError::Encoding(e.to_string()))?;
        let raw: [u8; 64] = bytes
            .try_into()
            .map_err(|_| SignatureError::Encoding("expected 64 bytes".into()))?;
        Ok(Self(ed25519_dalek::Signature::from_bytes(&raw)))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(D::Error::custom)
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({}..)", &self.to_hex()[..16])
    }
}
