//! In-memory profile store for tests and ephemeral nodes.

use std::collections::HashMap;
use std::sync::RwLock;

use keel_crypto::SigningKey;
use keel_types::{validate_peername, ProfileId};

use crate::error::{ProfileError, ProfileResult};
use crate::profile::{OwnerProfile, Profile};
use crate::traits::ProfileStore;

/// An in-memory implementation of [`ProfileStore`].
pub struct MemProfileStore {
    owner: OwnerProfile,
    profiles: RwLock<HashMap<ProfileId, Profile>>,
}

impl MemProfileStore {
    /// Create a store owned by the given key and peername. The owner's own
    /// profile is pre-registered.
    pub fn new(signing_key: SigningKey, peername: impl Into<String>) -> Self {
        let owner = OwnerProfile::new(signing_key, peername);
        let mut profiles = HashMap::new();
        profiles.insert(owner.id(), owner.profile().clone());
        Self {
            owner,
            profiles: RwLock::new(profiles),
        }
    }

    /// Number of known profiles, including the owner.
    pub fn len(&self) -> usize {
        self.profiles.read().expect("profile lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProfileStore for MemProfileStore {
    fn owner(&self) -> &OwnerProfile {
        &self.owner
    }

    fn get_by_id(&self, id: &ProfileId) -> Option<Profile> {
        self.profiles
            .read()
            .expect("profile lock poisoned")
            .get(id)
            .cloned()
    }

    fn get_by_peername(&self, peername: &str) -> Option<Profile> {
        self.profiles
            .read()
            .expect("profile lock poisoned")
            .values()
            .find(|p| p.peername == peername)
            .cloned()
    }

    fn add(&self, profile: Profile) -> ProfileResult<()> {
        validate_peername(&profile.peername)?;
        let mut profiles = self.profiles.write().expect("profile lock poisoned");
        let taken = profiles
            .values()
            .any(|p| p.peername == profile.peername && p.id != profile.id);
        if taken {
            return Err(ProfileError::PeernameTaken(profile.peername));
        }
        profiles.insert(profile.id, profile);
        Ok(())
    }
}
