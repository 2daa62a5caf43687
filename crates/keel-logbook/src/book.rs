use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use tracing::{debug, warn};

use keel_bus::{Bus, EventKind, LifecycleEvent};
use keel_crypto::SigningKey;
use keel_store::Filesystem;
use keel_types::{validate_dataset_name, ContentAddress, Dsref, ProfileId};

use crate::entry::{Log, LogEntry, Op, OpKind};
use crate::error::{LogbookError, LogbookResult};
use crate::resolve::project;

/// Page size used when a caller passes `limit <= 0`.
pub const DEFAULT_PAGE_SIZE: i64 = 25;

/// Domain tag for logbook export snapshots written to the filesystem.
const SNAPSHOT_TAG: &str = "keel-logbook-v1";

/// The node-local aggregate of every known identity's operation log.
///
/// Exactly one identity (the owner, fixed at construction) can append here;
/// all other logs arrive via [`Logbook::merge_log`] and stay read-only
/// mirrors. All mutation happens under a single write lock, so appends are
/// strictly serialized; reads run in parallel and always observe complete
/// entries.
pub struct Logbook {
    owner_key: SigningKey,
    owner: ProfileId,
    peername: String,
    bus: Arc<Bus>,
    fs: Arc<dyn Filesystem>,
    state: RwLock<BookState>,
}

#[derive(Default)]
struct BookState {
    logs: HashMap<ProfileId, Log>,
    snapshot: Option<ContentAddress>,
}

impl Logbook {
    /// Create a logbook owned by the holder of `owner_key`.
    ///
    /// The owner's log itself is created lazily by the first append.
    pub fn new(
        owner_key: SigningKey,
        peername: impl Into<String>,
        bus: Arc<Bus>,
        fs: Arc<dyn Filesystem>,
    ) -> Self {
        let owner = owner_key.verifying_key().to_profile_id();
        Self {
            owner_key,
            owner,
            peername: peername.into(),
            bus,
            fs,
            state: RwLock::new(BookState::default()),
        }
    }

    /// Identity of the owning profile.
    pub fn owner(&self) -> ProfileId {
        self.owner
    }

    /// Peername of the owning profile.
    pub fn peername(&self) -> &str {
        &self.peername
    }

    /// Address of the most recent export snapshot, if one has been written.
    pub fn snapshot_address(&self) -> LogbookResult<Option<ContentAddress>> {
        Ok(self.read_state()?.snapshot)
    }

    /// Identities with a log known to this node, sorted.
    pub fn known_authors(&self) -> LogbookResult<Vec<ProfileId>> {
        let state = self.read_state()?;
        let mut authors: Vec<_> = state.logs.keys().copied().collect();
        authors.sort();
        Ok(authors)
    }

    // ---- Appends ----

    /// Append an operation to the owner's log.
    ///
    /// The entry links to whatever the tail is at the moment the write lock
    /// is held; serialization is structural, not optimistic.
    pub fn append(&self, op: Op) -> LogbookResult<LogEntry> {
        let mut state = self.write_state()?;
        let expected = state
            .logs
            .get(&self.owner)
            .and_then(Log::tail_hash);
        self.append_locked(&mut state, op, expected)
    }

    /// Append an operation that expects a specific tail hash.
    ///
    /// Fails with an integrity error if the log has moved past
    /// `expected_tail`, surfacing lost races and divergent replicas instead
    /// of silently reordering history.
    pub fn append_at(&self, op: Op, expected_tail: Option<[u8; 32]>) -> LogbookResult<LogEntry> {
        let mut state = self.write_state()?;
        self.append_locked(&mut state, op, expected_tail)
    }

    fn append_locked(
        &self,
        state: &mut BookState,
        op: Op,
        expected_tail: Option<[u8; 32]>,
    ) -> LogbookResult<LogEntry> {
        self.check_op(state, &op)?;

        let author_key = self.owner_key.verifying_key().as_bytes();
        let log = state
            .logs
            .entry(self.owner)
            .or_insert_with(|| Log::new(author_key, self.peername.clone()));

        if log.tail_hash() != expected_tail {
            return Err(LogbookError::Integrity {
                reason: "append attempted with mismatched previous hash".into(),
            });
        }

        let seq = (log.len() + 1) as u64;
        let entry = LogEntry::sign_new(&self.owner_key, seq, &op, Utc::now(), expected_tail)?;
        log.entries.push(entry.clone());

        debug!(
            kind = entry.kind.name(),
            name = %entry.name,
            seq,
            "logbook append"
        );
        self.publish_append(&entry);
        self.save_locked(state);
        Ok(entry)
    }

    /// Validate an operation against the owner's current bindings before
    /// anything is signed. A failed check performs no work.
    fn check_op(&self, state: &BookState, op: &Op) -> LogbookResult<()> {
        validate_dataset_name(&op.name).map_err(|e| LogbookError::InvalidOp(e.to_string()))?;

        let projection = state.logs.get(&self.owner).map(project).unwrap_or_default();
        let live = |name: &str| projection.get_live(name).is_some();

        match &op.kind {
            OpKind::Init => {
                if live(&op.name) {
                    return Err(LogbookError::InvalidOp(format!(
                        "dataset name {:?} is already in use",
                        op.name
                    )));
                }
            }
            OpKind::Rename { from } => {
                if !live(from) {
                    return Err(LogbookError::InvalidOp(format!(
                        "cannot rename {from:?}: no such dataset"
                    )));
                }
                if live(&op.name) {
                    return Err(LogbookError::InvalidOp(format!(
                        "dataset name {:?} is already in use",
                        op.name
                    )));
                }
            }
            OpKind::Delete => {
                if !live(&op.name) {
                    return Err(LogbookError::InvalidOp(format!(
                        "cannot delete {:?}: no such dataset",
                        op.name
                    )));
                }
            }
            OpKind::Commit => {
                if op.path.is_none() {
                    return Err(LogbookError::InvalidOp(
                        "commit requires a content address".into(),
                    ));
                }
                if !live(&op.name) {
                    return Err(LogbookError::InvalidOp(format!(
                        "cannot commit to {:?}: no such dataset",
                        op.name
                    )));
                }
            }
        }
        Ok(())
    }

    fn publish_append(&self, entry: &LogEntry) {
        let alias = format!("{}/{}", self.peername, entry.name);
        let kind = match entry.kind {
            OpKind::Init => EventKind::DatasetCreated,
            OpKind::Rename { .. } => EventKind::DatasetRenamed,
            OpKind::Delete => EventKind::DatasetDeleted,
            OpKind::Commit => EventKind::VersionCommitted,
        };
        let mut event = LifecycleEvent::new(self.owner, kind, alias);
        if let Some(path) = entry.path {
            event = event.with_path(path);
        }
        self.bus.publish(event);
    }

    /// Persist an export snapshot through the filesystem collaborator.
    ///
    /// The in-memory state stays authoritative; a failed save is logged and
    /// the already-applied mutation stands.
    fn save_locked(&self, state: &mut BookState) {
        let mut logs: Vec<&Log> = state.logs.values().collect();
        logs.sort_by_key(|l| l.author);

        let encoded = match serde_json::to_vec(&(SNAPSHOT_TAG, &logs)) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(%err, "failed to encode logbook snapshot");
                return;
            }
        };
        match self.fs.write(&encoded) {
            Ok(address) => {
                state.snapshot = Some(address);
                self.bus.publish(LifecycleEvent::new(
                    self.owner,
                    EventKind::LogbookWritten,
                    "",
                ));
            }
            Err(err) => warn!(%err, "failed to save logbook snapshot"),
        }
    }

    // ---- Queries ----

    /// One page of the identified dataset's entries, ordered by sequence
    /// position. `limit <= 0` defaults to [`DEFAULT_PAGE_SIZE`]; `offset < 0`
    /// clamps to 0.
    pub fn log_entries(
        &self,
        reference: &Dsref,
        offset: i64,
        limit: i64,
    ) -> LogbookResult<Vec<LogEntry>> {
        let state = self.read_state()?;
        let log = match self.find_owner_log(&state, reference) {
            Ok(log) => log,
            Err(LogbookError::RefNotFound { .. }) => {
                return Err(LogbookError::NotFound {
                    alias: reference.alias(),
                })
            }
            Err(other) => return Err(other),
        };

        let projection = project(log);
        let binding = projection
            .get(&reference.name)
            .ok_or_else(|| LogbookError::NotFound {
                alias: reference.alias(),
            })?;

        let (offset, limit) = clamp_page(offset, limit);
        Ok(binding
            .entries
            .iter()
            .skip(offset)
            .take(limit)
            .map(|&i| log.entries[i].clone())
            .collect())
    }

    /// One newest-first page of the dataset's version commits.
    ///
    /// This is the flattened, display-oriented view behind history listings,
    /// distinct from the raw entry stream.
    pub fn dataset_versions(
        &self,
        reference: &Dsref,
        offset: i64,
        limit: i64,
    ) -> LogbookResult<Vec<LogEntry>> {
        let state = self.read_state()?;
        let log = self.find_owner_log(&state, reference)?;

        let projection = project(log);
        let binding = projection
            .get(&reference.name)
            .ok_or_else(|| LogbookError::RefNotFound {
                text: reference.to_string(),
            })?;

        let (offset, limit) = clamp_page(offset, limit);
        Ok(binding
            .versions
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .map(|&i| log.entries[i].clone())
            .collect())
    }

    /// Full export of every known log, sorted by author. Cost is
    /// proportional to total entry count; not for hot paths.
    pub fn raw_logs(&self) -> LogbookResult<Vec<Log>> {
        let state = self.read_state()?;
        let mut logs: Vec<Log> = state.logs.values().cloned().collect();
        logs.sort_by_key(|l| l.author);
        Ok(logs)
    }

    /// Resolve a reference in place: fill in the canonical owner identity
    /// and the content address currently bound to the name.
    pub fn resolve_ref(&self, reference: &mut Dsref) -> LogbookResult<()> {
        let state = self.read_state()?;
        let log = self.find_owner_log(&state, reference)?;

        let owner_id = log.author;
        let peername = log.peername.clone();

        if let Some(requested) = reference.path {
            // An explicit version must exist in this owner's chain. It stays
            // resolvable after deletion; history is immutable.
            let recorded = log.entries.iter().any(|e| e.path == Some(requested));
            if !recorded {
                return Err(LogbookError::RefNotFound {
                    text: reference.to_string(),
                });
            }
            reference.owner_id = Some(owner_id);
            reference.owner = peername;
            return Ok(());
        }

        let projection = project(log);
        let binding =
            projection
                .get_live(&reference.name)
                .ok_or_else(|| LogbookError::RefNotFound {
                    text: reference.to_string(),
                })?;

        reference.owner_id = Some(owner_id);
        reference.owner = peername;
        reference.path = binding.head;
        Ok(())
    }

    /// Locate the log a reference points into.
    ///
    /// Bare references resolve only when exactly one known identity claims
    /// the name; otherwise the caller gets an ambiguity error listing the
    /// claimants.
    fn find_owner_log<'a>(
        &self,
        state: &'a BookState,
        reference: &Dsref,
    ) -> LogbookResult<&'a Log> {
        if let Some(id) = reference.owner_id {
            return state.logs.get(&id).ok_or_else(|| LogbookError::RefNotFound {
                text: reference.to_string(),
            });
        }

        if !reference.owner.is_empty() {
            return state
                .logs
                .values()
                .find(|log| log.peername == reference.owner)
                .ok_or_else(|| LogbookError::RefNotFound {
                    text: reference.to_string(),
                });
        }

        let mut claimants: Vec<&Log> = state
            .logs
            .values()
            .filter(|log| project(log).get(&reference.name).is_some())
            .collect();
        claimants.sort_by_key(|l| l.author);

        match claimants.as_slice() {
            [] => Err(LogbookError::RefNotFound {
                text: reference.to_string(),
            }),
            [only] => Ok(*only),
            many => Err(LogbookError::AmbiguousRef {
                name: reference.name.clone(),
                owners: many.iter().map(|l| l.peername.clone()).collect(),
            }),
        }
    }

    // ---- Replicas ----

    /// Merge a log received from a peer.
    ///
    /// The incoming chain is verified in full before anything changes. A
    /// known identity's replica must extend (or equal) what we already
    /// hold; a chain sharing a prefix but then diverging is a fork and is
    /// rejected, never merged.
    ///
    /// The peername label sits outside the signed chain, so admission
    /// enforces its uniqueness: an otherwise valid chain claiming a
    /// peername already held by a different identity is rejected. Without
    /// this check a peer could sign its own chain under someone else's
    /// name and capture peername-qualified resolution.
    pub fn merge_log(&self, incoming: Log) -> LogbookResult<()> {
        incoming.verify()?;

        let mut state = self.write_state()?;

        let hijacks_owner =
            incoming.peername == self.peername && incoming.author != self.owner;
        let collides = state
            .logs
            .values()
            .any(|log| log.peername == incoming.peername && log.author != incoming.author);
        if hijacks_owner || collides {
            return Err(LogbookError::Integrity {
                reason: format!(
                    "peername {:?} is already claimed by another identity",
                    incoming.peername
                ),
            });
        }

        if let Some(existing) = state.logs.get(&incoming.author) {
            for (ours, theirs) in existing.entries.iter().zip(incoming.entries.iter()) {
                if ours.hash != theirs.hash {
                    return Err(LogbookError::Integrity {
                        reason: format!(
                            "replica of {} diverges at seq {}",
                            incoming.author, ours.seq
                        ),
                    });
                }
            }
            if incoming.len() <= existing.len() {
                // Nothing new; the replica is a (possibly stale) mirror.
                return Ok(());
            }
        }

        debug!(author = %incoming.author, entries = incoming.len(), "merged replica log");
        state.logs.insert(incoming.author, incoming);
        self.save_locked(&mut state);
        Ok(())
    }

    /// Re-validate the full chain of a known log.
    pub fn verify_log(&self, author: &ProfileId) -> LogbookResult<()> {
        let state = self.read_state()?;
        let log = state.logs.get(author).ok_or_else(|| LogbookError::NotFound {
            alias: author.short_id(),
        })?;
        log.verify()
    }

    // ---- Lock plumbing ----

    fn read_state(&self) -> LogbookResult<std::sync::RwLockReadGuard<'_, BookState>> {
        self.state.read().map_err(|_| LogbookError::Integrity {
            reason: "logbook lock poisoned".into(),
        })
    }

    fn write_state(&self) -> LogbookResult<std::sync::RwLockWriteGuard<'_, BookState>> {
        self.state.write().map_err(|_| LogbookError::Integrity {
            reason: "logbook lock poisoned".into(),
        })
    }
}

/// Normalize pagination parameters: `limit <= 0` means the default page
/// size, `offset < 0` means the first page.
fn clamp_page(offset: i64, limit: i64) -> (usize, usize) {
    let limit = if limit <= 0 { DEFAULT_PAGE_SIZE } else { limit };
    let offset = offset.max(0);
    (offset as usize, limit as usize)
}
