use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use keel_crypto::{hash_canonical, Signature, SigningKey, VerifyingKey};
use keel_types::{ContentAddress, ProfileId};

use crate::error::{LogbookError, LogbookResult};

/// Domain tag for log entry hashes.
const ENTRY_TAG: &[u8] = b"keel-entry-v1:";

/// The closed set of dataset lifecycle operations.
///
/// Resolution logic matches exhaustively over this enum, so adding a kind
/// is a compile-visible event everywhere it matters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpKind {
    /// Create a dataset under a new name.
    Init,
    /// Move a dataset from a previous name to the entry's name.
    Rename { from: String },
    /// Tombstone a dataset. History remains; the name stops resolving.
    Delete,
    /// Record a new immutable version of the dataset's content.
    Commit,
}

impl OpKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Rename { .. } => "rename",
            Self::Delete => "delete",
            Self::Commit => "commit",
        }
    }
}

/// A lifecycle operation to be appended to the owner's log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Op {
    pub kind: OpKind,
    /// Dataset name the operation applies to (the new name, for renames).
    pub name: String,
    /// Content address produced by the operation, for commits.
    pub path: Option<ContentAddress>,
    /// Free-form human note, e.g. a commit title.
    pub note: Option<String>,
}

impl Op {
    pub fn init(name: impl Into<String>) -> Self {
        Self {
            kind: OpKind::Init,
            name: name.into(),
            path: None,
            note: None,
        }
    }

    pub fn rename(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            kind: OpKind::Rename { from: from.into() },
            name: to.into(),
            path: None,
            note: None,
        }
    }

    pub fn delete(name: impl Into<String>) -> Self {
        Self {
            kind: OpKind::Delete,
            name: name.into(),
            path: None,
            note: None,
        }
    }

    pub fn commit(name: impl Into<String>, path: ContentAddress) -> Self {
        Self {
            kind: OpKind::Commit,
            name: name.into(),
            path: Some(path),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// One record in an identity's operation log.
///
/// Entries form a strictly ordered, tamper-evident chain: `prev` links to
/// the prior entry's hash, `hash` covers every field including `prev`, and
/// `signature` covers `hash`. Entries are never edited or deleted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Position in the chain, starting at 1.
    pub seq: u64,
    pub kind: OpKind,
    /// Dataset name at the time of the operation.
    pub name: String,
    pub timestamp: DateTime<Utc>,
    /// Resulting content address, for commits.
    pub path: Option<ContentAddress>,
    pub note: Option<String>,
    /// Identity that signed the entry.
    pub author: ProfileId,
    /// Hash of the prior entry; `None` only for the first entry.
    pub prev: Option<[u8; 32]>,
    /// BLAKE3 over the domain-tagged canonical encoding of all fields above.
    pub hash: [u8; 32],
    /// Ed25519 signature over `hash` by the author's key.
    pub signature: Signature,
}

/// Borrowed view of the fields covered by an entry's hash.
#[derive(Serialize)]
struct EntryPayload<'a> {
    seq: u64,
    kind: &'a OpKind,
    name: &'a str,
    timestamp: &'a DateTime<Utc>,
    path: &'a Option<ContentAddress>,
    note: &'a Option<String>,
    author: &'a ProfileId,
    prev: &'a Option<[u8; 32]>,
}

impl LogEntry {
    /// Build, hash, and sign a new entry.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn sign_new(
        key: &SigningKey,
        seq: u64,
        op: &Op,
        timestamp: DateTime<Utc>,
        prev: Option<[u8; 32]>,
    ) -> LogbookResult<Self> {
        let author = key.verifying_key().to_profile_id();
        let hash = hash_canonical(
            ENTRY_TAG,
            &EntryPayload {
                seq,
                kind: &op.kind,
                name: &op.name,
                timestamp: &timestamp,
                path: &op.path,
                note: &op.note,
                author: &author,
                prev: &prev,
            },
        )?;
        let signature = key.sign(&hash);
        Ok(Self {
            seq,
            kind: op.kind.clone(),
            name: op.name.clone(),
            timestamp,
            path: op.path,
            note: op.note.clone(),
            author,
            prev,
            hash,
            signature,
        })
    }

    /// Recompute the hash from the entry's fields.
    pub fn compute_hash(&self) -> LogbookResult<[u8; 32]> {
        Ok(hash_canonical(
            ENTRY_TAG,
            &EntryPayload {
                seq: self.seq,
                kind: &self.kind,
                name: &self.name,
                timestamp: &self.timestamp,
                path: &self.path,
                note: &self.note,
                author: &self.author,
                prev: &self.prev,
            },
        )?)
    }

    /// Verify the stored hash and signature against the given key.
    pub fn verify(&self, key: &VerifyingKey) -> LogbookResult<()> {
        let computed = self.compute_hash()?;
        if computed != self.hash {
            return Err(LogbookError::Integrity {
                reason: format!("entry {} hash mismatch", self.seq),
            });
        }
        key.verify(&self.hash, &self.signature)
            .map_err(|_| LogbookError::Integrity {
                reason: format!("entry {} signature invalid", self.seq),
            })
    }
}

/// One identity's full operation chain.
///
/// Only the holder of the identity's private key may extend a log; copies
/// held by other peers are read-only mirrors with identical content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Log {
    pub author: ProfileId,
    /// Raw ed25519 public key of the author, for verification.
    pub author_key: [u8; 32],
    pub peername: String,
    pub entries: Vec<LogEntry>,
}

impl Log {
    pub fn new(author_key: [u8; 32], peername: impl Into<String>) -> Self {
        Self {
            author: ProfileId::from_public_key(&author_key),
            author_key,
            peername: peername.into(),
            entries: Vec::new(),
        }
    }

    /// Hash of the newest entry, if any.
    pub fn tail_hash(&self) -> Option<[u8; 32]> {
        self.entries.last().map(|e| e.hash)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate the whole chain: author/key binding, hash links, sequence
    /// continuity, and every signature.
    pub fn verify(&self) -> LogbookResult<()> {
        let key = VerifyingKey::from_bytes(self.author_key).map_err(|_| {
            LogbookError::Integrity {
                reason: "author key is not a valid ed25519 public key".into(),
            }
        })?;
        if key.to_profile_id() != self.author {
            return Err(LogbookError::Integrity {
                reason: "author id does not match author key".into(),
            });
        }

        let mut prev: Option<[u8; 32]> = None;
        for (index, entry) in self.entries.iter().enumerate() {
            let expected_seq = (index + 1) as u64;
            if entry.seq != expected_seq {
                return Err(LogbookError::Integrity {
                    reason: format!("expected seq {expected_seq}, found {}", entry.seq),
                });
            }
            if entry.prev != prev {
                return Err(LogbookError::Integrity {
                    reason: format!("entry {} previous hash link mismatch", entry.seq),
                });
            }
            if entry.author != self.author {
                return Err(LogbookError::Integrity {
                    reason: format!("entry {} signed by a different author", entry.seq),
                });
            }
            entry.verify(&key)?;
            prev = Some(entry.hash);
        }
        Ok(())
    }
}
