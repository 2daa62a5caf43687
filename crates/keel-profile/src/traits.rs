use keel_types::{Dsref, ProfileId};

use crate::error::ProfileResult;
use crate::profile::{OwnerProfile, Profile};

/// Identity boundary for the node.
///
/// Stores the public profiles of every known peer plus the single active
/// owner. Implementations must keep peernames unique.
pub trait ProfileStore: Send + Sync {
    /// The active owner of this process.
    fn owner(&self) -> &OwnerProfile;

    /// Look up a profile by identity.
    fn get_by_id(&self, id: &ProfileId) -> Option<Profile>;

    /// Look up a profile by peername.
    fn get_by_peername(&self, peername: &str) -> Option<Profile>;

    /// Record a peer profile learned from the network.
    fn add(&self, profile: Profile) -> ProfileResult<()>;

    /// Canonicalize the owner portion of a reference in place.
    ///
    /// - the `me` alias becomes the active owner's peername and id
    /// - a known peername gains its `owner_id`
    /// - an `owner_id` set without a peername gains the peername
    ///
    /// An unknown peername is left untouched: resolution downstream decides
    /// whether that is an error. Bare references pass through unchanged.
    fn canonicalize_owner(&self, reference: &mut Dsref) -> ProfileResult<()> {
        if reference.owner == "me" {
            let owner = self.owner();
            reference.owner = owner.peername().to_string();
            reference.owner_id = Some(owner.id());
            return Ok(());
        }

        if let Some(id) = reference.owner_id {
            if reference.owner.is_empty() {
                if let Some(profile) = self.get_by_id(&id) {
                    reference.owner = profile.peername;
                }
            }
            return Ok(());
        }

        if !reference.owner.is_empty() {
            if let Some(profile) = self.get_by_peername(&reference.owner) {
                reference.owner_id = Some(profile.id);
            }
        }
        Ok(())
    }
}
