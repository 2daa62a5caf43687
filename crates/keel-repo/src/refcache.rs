//! Ephemeral cache of resolved references.
//!
//! The cache is pure bookkeeping: every entry can be reconstructed from the
//! logbook, so losing it costs a re-resolution and nothing else. It is
//! populated as a side effect of [`crate::Repo::resolve_ref`].

use std::collections::HashMap;
use std::sync::RwLock;

use keel_types::{ContentAddress, Dsref, ProfileId};

/// A cached resolution outcome, keyed by the reference's alias.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedRef {
    pub owner_id: ProfileId,
    /// Head version at resolution time. `None` for datasets with no
    /// committed version yet.
    pub path: Option<ContentAddress>,
}

/// In-memory alias-to-resolution map.
#[derive(Default)]
pub struct RefCache {
    entries: RwLock<HashMap<String, CachedRef>>,
}

impl RefCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a successful resolution. Uncanonicalized
    /// references are skipped; there is nothing authoritative to cache.
    pub fn record(&self, reference: &Dsref) {
        let Some(owner_id) = reference.owner_id else {
            return;
        };
        let cached = CachedRef {
            owner_id,
            path: reference.path,
        };
        self.entries
            .write()
            .expect("ref cache lock poisoned")
            .insert(reference.alias(), cached);
    }

    /// Look up a previous resolution by alias.
    pub fn get(&self, alias: &str) -> Option<CachedRef> {
        self.entries
            .read()
            .expect("ref cache lock poisoned")
            .get(alias)
            .cloned()
    }

    /// Drop one alias, forcing re-resolution on next use.
    pub fn invalidate(&self, alias: &str) {
        self.entries
            .write()
            .expect("ref cache lock poisoned")
            .remove(alias);
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.entries
            .write()
            .expect("ref cache lock poisoned")
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("ref cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
