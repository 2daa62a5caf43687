//! Identity and profile store for Keel.
//!
//! A [`Profile`] binds a [`keel_types::ProfileId`] to a peername and public
//! key. The [`ProfileStore`] trait is the identity boundary consumed by the
//! repository and the request shim: it supplies the active owner (the one
//! profile holding a private key in this process) and canonicalizes the
//! owner portion of dataset references.

pub mod error;
pub mod memory;
pub mod profile;
pub mod traits;

pub use error::{ProfileError, ProfileResult};
pub use memory::MemProfileStore;
pub use profile::{OwnerProfile, Profile};
pub use traits::ProfileStore;
