use tokio::sync::watch;

use keel_types::ContentAddress;

use crate::error::StoreResult;

/// Content-addressed block storage.
///
/// All implementations must satisfy these invariants:
/// - Blocks are immutable once written. Content-addressing guarantees this:
///   the same data always produces the same address, and no operation ever
///   rewrites the bytes behind an existing address.
/// - Writes are idempotent: writing data that is already stored is a no-op
///   returning the same address.
/// - Concurrent reads are always safe and observe complete blocks.
/// - All I/O errors are propagated, never silently ignored.
pub trait Filesystem: Send + Sync {
    /// Write a block and return its content address.
    fn write(&self, data: &[u8]) -> StoreResult<ContentAddress>;

    /// Read a block by address. Returns `Ok(None)` if absent.
    fn read(&self, address: &ContentAddress) -> StoreResult<Option<Vec<u8>>>;

    /// Check whether a block exists.
    fn has(&self, address: &ContentAddress) -> StoreResult<bool>;

    /// Completion signal: the receiver observes `true` exactly once, after
    /// the filesystem has finished shutting down.
    fn done(&self) -> watch::Receiver<bool>;

    /// The error that terminated the filesystem, if shutdown failed.
    /// Meaningful only after `done()` has fired.
    fn done_err(&self) -> Option<crate::error::StoreError>;
}
