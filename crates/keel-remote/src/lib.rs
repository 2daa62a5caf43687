//! Dataset history requests for Keel, served locally or over the wire.
//!
//! [`LogRequests`] is the one handle callers use for history queries. Its
//! target, the local [`keel_repo::Repo`] or a [`RemoteClient`] transport,
//! is fixed at construction; both targets answer identically for identical
//! state. Errors cross the transport as [`Fault`] values and come back as
//! the same [`RemoteError`] category they left with.

pub mod client;
pub mod fault;
pub mod items;
pub mod protocol;
pub mod requests;

pub use client::RemoteClient;
pub use fault::{Fault, FaultCode, RemoteError, RemoteResult};
pub use items::DatasetLogItem;
pub use protocol::{PROTOCOL_ID, SERVICE_TAG};
pub use requests::{LogParams, LogRequests, LogTarget, RefListParams};
