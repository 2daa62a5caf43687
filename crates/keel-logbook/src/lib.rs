//! Append-only dataset history for Keel.
//!
//! This crate is the heart of the platform. It provides:
//! - [`LogEntry`] / [`Log`]: signed, hash-linked per-identity operation
//!   chains recording dataset lifecycle events
//! - [`Logbook`]: the node-local aggregate of every known identity's log,
//!   with strictly serialized appends, pagination, and full export
//! - reference resolution: mapping `owner/name[@version]` onto the content
//!   address currently bound to the name
//! - replica merging with full chain verification; genuinely divergent
//!   replicas of one identity surface as integrity errors, never merges
//!
//! Appends happen under a single write lock, so "exactly one concurrent
//! writer per identity" is a property of the structure, not a convention.

pub mod book;
pub mod entry;
pub mod error;
pub mod resolve;

pub use book::{Logbook, DEFAULT_PAGE_SIZE};
pub use entry::{Log, LogEntry, Op, OpKind};
pub use error::{LogbookError, LogbookResult};
