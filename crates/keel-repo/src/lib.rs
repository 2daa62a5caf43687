//! The repository facade for Keel.
//!
//! [`Repo`] is the composition point handed to the request layer: event
//! bus, content-addressed filesystem, profile store, and logbook behind one
//! handle, plus the shutdown join that collapses every subsystem's
//! completion into a single signal.

pub mod error;
pub mod refcache;
pub mod repo;
mod shutdown;

pub use error::{RepoError, RepoResult};
pub use refcache::{CachedRef, RefCache};
pub use repo::Repo;
