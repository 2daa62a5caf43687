use async_trait::async_trait;

use keel_logbook::{Log, LogEntry};

use crate::fault::Fault;
use crate::items::DatasetLogItem;
use crate::requests::{LogParams, RefListParams};

/// Transport boundary to a remote peer's request layer.
///
/// Implementations carry the request over whatever wire they like; errors
/// come back as serializable [`Fault`]s so the caller can recover the
/// original category.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Fetch a page of a dataset's version history.
    async fn fetch_log(&self, params: LogParams) -> Result<Vec<DatasetLogItem>, Fault>;

    /// Fetch a page of a dataset's raw log entries.
    async fn fetch_entries(&self, params: RefListParams) -> Result<Vec<LogEntry>, Fault>;

    /// Fetch the peer's full logbook export.
    async fn fetch_raw_logs(&self) -> Result<Vec<Log>, Fault>;
}
