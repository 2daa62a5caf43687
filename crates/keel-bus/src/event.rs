use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use keel_types::{ContentAddress, ProfileId};

/// The kinds of dataset lifecycle events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    DatasetCreated,
    DatasetRenamed,
    DatasetDeleted,
    VersionCommitted,
    LogbookWritten,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::DatasetCreated => "dataset-created",
            Self::DatasetRenamed => "dataset-renamed",
            Self::DatasetDeleted => "dataset-deleted",
            Self::VersionCommitted => "version-committed",
            Self::LogbookWritten => "logbook-written",
        };
        write!(f, "{name}")
    }
}

/// A single lifecycle notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// Identity whose log produced the event.
    pub owner: ProfileId,
    pub kind: EventKind,
    /// `owner/name` alias of the dataset concerned, empty for
    /// logbook-level events.
    pub alias: String,
    /// Version address, for `VersionCommitted` events.
    pub path: Option<ContentAddress>,
    pub timestamp: DateTime<Utc>,
}

impl LifecycleEvent {
    pub fn new(owner: ProfileId, kind: EventKind, alias: impl Into<String>) -> Self {
        Self {
            owner,
            kind,
            alias: alias.into(),
            path: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_path(mut self, path: ContentAddress) -> Self {
        self.path = Some(path);
        self
    }
}
