use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use keel_logbook::LogEntry;
use keel_types::ContentAddress;

/// One row in a human-facing dataset history listing.
///
/// Flattened from the underlying log entry: callers rendering history
/// tables need the alias, the time, the title, and the version address,
/// not the chain plumbing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetLogItem {
    /// `owner/name` the listing was requested under.
    pub alias: String,
    pub timestamp: DateTime<Utc>,
    /// Commit title, when the author supplied one.
    pub commit_title: Option<String>,
    /// Address of the version this row describes.
    pub path: Option<ContentAddress>,
}

impl DatasetLogItem {
    pub fn from_entry(alias: impl Into<String>, entry: &LogEntry) -> Self {
        Self {
            alias: alias.into(),
            timestamp: entry.timestamp,
            commit_title: entry.note.clone(),
            path: entry.path,
        }
    }
}
