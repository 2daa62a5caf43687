//! Foundation types for Keel, a peer-to-peer dataset versioning platform.
//!
//! This crate defines the value types shared across the workspace:
//! - [`ProfileId`]: persistent cryptographic identity of a peer
//! - [`ContentAddress`]: hash-derived identifier for immutable content
//! - [`Dsref`]: human-addressable dataset reference (`owner/name[@version]`)
//! - name validation rules for datasets and peernames

pub mod address;
pub mod dsref;
pub mod error;
pub mod identity;
pub mod names;

pub use address::ContentAddress;
pub use dsref::Dsref;
pub use error::{RefError, TypeError};
pub use identity::ProfileId;
pub use names::{validate_dataset_name, validate_peername};
