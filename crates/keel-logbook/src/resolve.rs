//! Name-binding projection over an identity's operation chain.
//!
//! Resolution replays a log from oldest to newest, maintaining an in-memory
//! map of which dataset each name currently binds. Init, rename, and delete
//! move bindings; commits record the candidate content address. The
//! projection is ephemeral and rebuilt on demand; the chain itself stays
//! authoritative.

use std::collections::HashMap;

use keel_types::ContentAddress;

use crate::entry::{Log, OpKind};

/// Current state of one dataset within an identity's log.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DatasetProjection {
    /// `false` once the dataset has been tombstoned.
    pub exists: bool,
    /// Content address of the newest committed version.
    pub head: Option<ContentAddress>,
    /// Indices into `Log::entries` belonging to this dataset, ascending.
    pub entries: Vec<usize>,
    /// Subset of `entries` that are version commits, ascending.
    pub versions: Vec<usize>,
}

/// Name bindings reconstructed from a full log.
#[derive(Clone, Debug, Default)]
pub struct LogProjection {
    /// Bindings keyed by the dataset's most recent name. Tombstoned
    /// datasets stay addressable here so history queries keep working
    /// after deletion.
    pub bindings: HashMap<String, DatasetProjection>,
}

impl LogProjection {
    /// The binding for a name, live or tombstoned.
    pub fn get(&self, name: &str) -> Option<&DatasetProjection> {
        self.bindings.get(name)
    }

    /// The binding for a name, only if the dataset still exists.
    pub fn get_live(&self, name: &str) -> Option<&DatasetProjection> {
        self.bindings.get(name).filter(|p| p.exists)
    }
}

/// Replay a log into its name-binding projection.
///
/// Matches exhaustively over [`OpKind`]: adding an operation kind is a
/// compile error here until resolution handles it.
pub fn project(log: &Log) -> LogProjection {
    let mut bindings: HashMap<String, DatasetProjection> = HashMap::new();

    for (index, entry) in log.entries.iter().enumerate() {
        match &entry.kind {
            OpKind::Init => {
                // A fresh init claims the name outright. If the name was
                // tombstoned, the new dataset supersedes it for name-keyed
                // queries; the raw chain keeps the old history.
                bindings.insert(
                    entry.name.clone(),
                    DatasetProjection {
                        exists: true,
                        head: None,
                        entries: vec![index],
                        versions: Vec::new(),
                    },
                );
            }
            OpKind::Rename { from } => {
                let mut projection = bindings.remove(from.as_str()).unwrap_or_default();
                projection.exists = true;
                projection.entries.push(index);
                bindings.insert(entry.name.clone(), projection);
            }
            OpKind::Delete => {
                let projection = bindings.entry(entry.name.clone()).or_default();
                projection.exists = false;
                projection.entries.push(index);
            }
            OpKind::Commit => {
                let projection = bindings
                    .entry(entry.name.clone())
                    .or_insert_with(|| DatasetProjection {
                        exists: true,
                        ..Default::default()
                    });
                projection.head = entry.path;
                projection.entries.push(index);
                projection.versions.push(index);
            }
        }
    }

    LogProjection { bindings }
}
