use std::sync::{Arc, RwLock};

use tokio::sync::watch;

use keel_bus::Bus;
use keel_crypto::SigningKey;
use keel_logbook::Logbook;
use keel_profile::{MemProfileStore, ProfileStore};
use keel_store::{Filesystem, MemFilesystem};
use keel_types::Dsref;

use crate::error::{RepoError, RepoResult};
use crate::refcache::RefCache;
use crate::shutdown::{self, Subsystem};

/// The repository: the single handle composing a node's collaborators.
///
/// A repo owns nothing algorithmic itself. It wires the event bus, the
/// content-addressed filesystem, the profile store, and the logbook
/// together, funnels reference resolution through canonicalization, and
/// aggregates subsystem shutdown into one completion signal.
pub struct Repo {
    bus: Arc<Bus>,
    filesystem: Arc<dyn Filesystem>,
    profiles: Arc<dyn ProfileStore>,
    logbook: RwLock<Option<Arc<Logbook>>>,
    ref_cache: RefCache,
}

impl Repo {
    /// Open an in-memory repository for the holder of `signing_key`.
    ///
    /// Builds the default collaborator set: a fresh bus, an in-memory
    /// filesystem, a profile store pre-registered with the owner, and a
    /// logbook writing through the filesystem.
    pub fn open(signing_key: SigningKey, peername: &str) -> Self {
        let bus = Arc::new(Bus::new());
        let filesystem: Arc<dyn Filesystem> = Arc::new(MemFilesystem::new());

        // The logbook and the profile store each hold the owner's key.
        let book_key = SigningKey::from_bytes(*signing_key.as_bytes());
        let profiles: Arc<dyn ProfileStore> =
            Arc::new(MemProfileStore::new(signing_key, peername));
        let logbook = Arc::new(Logbook::new(
            book_key,
            peername,
            Arc::clone(&bus),
            Arc::clone(&filesystem),
        ));

        Self::assemble(bus, filesystem, profiles, Some(logbook))
    }

    /// Compose a repository from explicit collaborators.
    pub fn assemble(
        bus: Arc<Bus>,
        filesystem: Arc<dyn Filesystem>,
        profiles: Arc<dyn ProfileStore>,
        logbook: Option<Arc<Logbook>>,
    ) -> Self {
        Self {
            bus,
            filesystem,
            profiles,
            logbook: RwLock::new(logbook),
            ref_cache: RefCache::new(),
        }
    }

    // ---- Collaborator accessors ----

    pub fn bus(&self) -> Arc<Bus> {
        Arc::clone(&self.bus)
    }

    pub fn filesystem(&self) -> Arc<dyn Filesystem> {
        Arc::clone(&self.filesystem)
    }

    pub fn profiles(&self) -> Arc<dyn ProfileStore> {
        Arc::clone(&self.profiles)
    }

    /// The logbook, unless it has been detached.
    pub fn logbook(&self) -> Option<Arc<Logbook>> {
        self.logbook.read().expect("repo lock poisoned").clone()
    }

    pub fn ref_cache(&self) -> &RefCache {
        &self.ref_cache
    }

    // ---- Logbook seams ----

    /// Remove the logbook, returning it. Resolution fails with
    /// [`RepoError::NoLogbook`] until one is set again. Exists so tests can
    /// exercise degraded-mode behavior.
    pub fn detach_logbook(&self) -> Option<Arc<Logbook>> {
        self.logbook.write().expect("repo lock poisoned").take()
    }

    /// Install a logbook, replacing any current one.
    pub fn set_logbook(&self, book: Arc<Logbook>) {
        *self.logbook.write().expect("repo lock poisoned") = Some(book);
    }

    // ---- Resolution ----

    /// Resolve a reference in place: canonicalize the owner against the
    /// profile store, then bind name to version against the logbook. A
    /// successful resolution is recorded in the ref cache.
    pub fn resolve_ref(&self, reference: &mut Dsref) -> RepoResult<()> {
        self.profiles.canonicalize_owner(reference)?;

        let book = self.logbook().ok_or(RepoError::NoLogbook)?;
        book.resolve_ref(reference)?;

        self.ref_cache.record(reference);
        Ok(())
    }

    // ---- Shutdown ----

    /// A signal that fires exactly once, after every subsystem with a
    /// teardown phase has finished. Must be called within a tokio runtime.
    pub fn done(&self) -> watch::Receiver<bool> {
        shutdown::join_all(self.subsystems())
    }

    /// First error among finished subsystems, in fixed order. Meaningful
    /// once [`Repo::done`] has fired.
    pub fn done_err(&self) -> Option<RepoError> {
        shutdown::first_error(&self.subsystems())
    }

    /// The fixed, ordered set of subsystems the shutdown join covers.
    fn subsystems(&self) -> Vec<Subsystem> {
        let fs = Arc::clone(&self.filesystem);
        vec![Subsystem::new("filesystem", self.filesystem.done(), move || {
            fs.done_err().map(|err| RepoError::Shutdown {
                subsystem: "filesystem",
                reason: err.to_string(),
            })
        })]
    }
}
