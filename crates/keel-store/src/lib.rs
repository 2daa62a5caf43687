//! Content-addressed filesystem abstraction for Keel.
//!
//! The [`Filesystem`] trait is the storage boundary the rest of the
//! workspace programs against: write-once, immutable blocks keyed by
//! [`keel_types::ContentAddress`], plus an asynchronous completion signal
//! consumed by the repository's shutdown join. [`MemFilesystem`] is the
//! in-memory implementation used in tests and embedded nodes.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::MemFilesystem;
pub use traits::Filesystem;
