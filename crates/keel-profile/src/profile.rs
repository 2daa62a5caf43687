use serde::{Deserialize, Serialize};

use keel_crypto::SigningKey;
use keel_types::ProfileId;

/// Public identity record for one peer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Identity derived from the public key.
    pub id: ProfileId,
    /// Human-friendly peer name, unique within this node's store.
    pub peername: String,
    /// Raw ed25519 public key.
    pub public_key: [u8; 32],
}

/// The active owner: a profile together with its private signing key.
///
/// Exactly one owner exists per node process; it is the only identity whose
/// log this process may append to.
pub struct OwnerProfile {
    profile: Profile,
    signing_key: SigningKey,
}

impl OwnerProfile {
    /// Build an owner from a signing key and peername. The profile id is
    /// derived from the key, never chosen.
    pub fn new(signing_key: SigningKey, peername: impl Into<String>) -> Self {
        let verifying = signing_key.verifying_key();
        let profile = Profile {
            id: verifying.to_profile_id(),
            peername: peername.into(),
            public_key: verifying.as_bytes(),
        };
        Self {
            profile,
            signing_key,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn id(&self) -> ProfileId {
        self.profile.id
    }

    pub fn peername(&self) -> &str {
        &self.profile.peername
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl std::fmt::Debug for OwnerProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnerProfile")
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}
