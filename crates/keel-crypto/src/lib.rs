//! Cryptographic primitives for Keel.
//!
//! Thin newtype wrappers around ed25519 signing keys plus domain-tagged
//! BLAKE3 hashing of canonically encoded values. The append-only log chain
//! in `keel-logbook` is built entirely on these two operations.

pub mod hasher;
pub mod signer;

pub use hasher::{hash_canonical, HashError};
pub use signer::{Signature, SignatureError, SigningKey, VerifyingKey};
