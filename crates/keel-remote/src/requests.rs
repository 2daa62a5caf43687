use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use keel_logbook::{Log, LogEntry, DEFAULT_PAGE_SIZE};
use keel_repo::Repo;
use keel_types::Dsref;

use crate::client::RemoteClient;
use crate::fault::{RemoteError, RemoteResult};
use crate::items::DatasetLogItem;

/// Parameters for a dataset history listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogParams {
    /// Text form of the dataset reference.
    pub reference: String,
    pub offset: i64,
    pub limit: i64,
}

impl LogParams {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            offset: 0,
            limit: 0,
        }
    }

    /// Clamp paging: `limit <= 0` becomes the default page size,
    /// `offset < 0` becomes 0. Applied before dispatch in either mode, so
    /// a remote peer never sees unclamped values.
    pub fn normalized(&self) -> Self {
        Self {
            reference: self.reference.clone(),
            offset: self.offset.max(0),
            limit: if self.limit <= 0 {
                DEFAULT_PAGE_SIZE
            } else {
                self.limit
            },
        }
    }
}

/// Parameters for a raw entry listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefListParams {
    pub reference: String,
    pub offset: i64,
    pub limit: i64,
}

impl RefListParams {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            offset: 0,
            limit: 0,
        }
    }

    pub fn normalized(&self) -> Self {
        Self {
            reference: self.reference.clone(),
            offset: self.offset.max(0),
            limit: if self.limit <= 0 {
                DEFAULT_PAGE_SIZE
            } else {
                self.limit
            },
        }
    }
}

/// Where a [`LogRequests`] sends its work.
///
/// The target is fixed at construction. A request value is either local or
/// remote for its whole life; there is no per-call fallback and no state in
/// which both targets are live.
#[derive(Clone)]
pub enum LogTarget {
    /// Serve from this process's own repository.
    Local(Arc<Repo>),
    /// Forward to a peer over a transport.
    Remote(Arc<dyn RemoteClient>),
}

/// Dataset history requests, served locally or forwarded to a peer.
///
/// Callers hold one of these and stay oblivious to where answers come
/// from; both targets produce identical results for identical state.
pub struct LogRequests {
    target: LogTarget,
}

impl LogRequests {
    /// Requests answered by the local repository.
    pub fn local(repo: Arc<Repo>) -> Self {
        Self {
            target: LogTarget::Local(repo),
        }
    }

    /// Requests forwarded to a remote peer.
    pub fn remote(client: Arc<dyn RemoteClient>) -> Self {
        Self {
            target: LogTarget::Remote(client),
        }
    }

    /// Human-facing version history for one dataset, newest first.
    ///
    /// The owner portion of the reference is canonicalized (`me`, known
    /// peernames), but the name is not required to resolve to a live head:
    /// history listings work for datasets with no commits yet.
    pub async fn log(&self, params: &LogParams) -> RemoteResult<Vec<DatasetLogItem>> {
        let params = params.normalized();
        debug!(reference = %params.reference, "log request");
        match &self.target {
            LogTarget::Remote(client) => {
                Ok(client.fetch_log(params).await.map_err(RemoteError::from)?)
            }
            LogTarget::Local(repo) => {
                let mut reference = Dsref::parse(&params.reference)?;
                repo.profiles()
                    .canonicalize_owner(&mut reference)
                    .map_err(|e| RemoteError::Internal(e.to_string()))?;

                let book = repo.logbook().ok_or(RemoteError::NoLogbook)?;
                let versions =
                    book.dataset_versions(&reference, params.offset, params.limit)?;

                let alias = reference.alias();
                Ok(versions
                    .iter()
                    .map(|entry| DatasetLogItem::from_entry(alias.clone(), entry))
                    .collect())
            }
        }
    }

    /// Raw log entries for one dataset, oldest first.
    ///
    /// Unlike [`LogRequests::log`], the reference is fully resolved first,
    /// so a dangling reference fails here even when paging would be empty.
    pub async fn logbook(&self, params: &RefListParams) -> RemoteResult<Vec<LogEntry>> {
        let params = params.normalized();
        debug!(reference = %params.reference, "logbook request");
        match &self.target {
            LogTarget::Remote(client) => Ok(client
                .fetch_entries(params)
                .await
                .map_err(RemoteError::from)?),
            LogTarget::Local(repo) => {
                let mut reference = Dsref::parse(&params.reference)?;
                repo.resolve_ref(&mut reference)?;

                let book = repo.logbook().ok_or(RemoteError::NoLogbook)?;
                Ok(book.log_entries(&reference, params.offset, params.limit)?)
            }
        }
    }

    /// Full logbook export: every known identity's complete log.
    ///
    /// Yields to the scheduler between logs so a caller that drops the
    /// future mid-export stops promptly.
    pub async fn raw_logs(&self) -> RemoteResult<Vec<Log>> {
        debug!("raw logs request");
        match &self.target {
            LogTarget::Remote(client) => {
                Ok(client.fetch_raw_logs().await.map_err(RemoteError::from)?)
            }
            LogTarget::Local(repo) => {
                let book = repo.logbook().ok_or(RemoteError::NoLogbook)?;
                let mut out = Vec::new();
                for log in book.raw_logs()? {
                    out.push(log);
                    tokio::task::yield_now().await;
                }
                Ok(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use keel_crypto::SigningKey;
    use keel_logbook::Op;
    use keel_types::ContentAddress;

    use crate::fault::Fault;

    fn addr(label: &[u8]) -> ContentAddress {
        ContentAddress::for_content(label)
    }

    fn seeded_repo() -> Arc<Repo> {
        let repo = Repo::open(SigningKey::generate(), "b5");
        let book = repo.logbook().unwrap();
        book.append(Op::init("population")).unwrap();
        book.append(Op::commit("population", addr(b"v1")).with_note("first"))
            .unwrap();
        book.append(Op::commit("population", addr(b"v2")).with_note("second"))
            .unwrap();
        Arc::new(repo)
    }

    /// Transport that hands requests straight to another node's shim,
    /// exercising the fault mapping in both directions.
    struct Loopback {
        inner: LogRequests,
    }

    #[async_trait]
    impl RemoteClient for Loopback {
        async fn fetch_log(&self, params: LogParams) -> Result<Vec<DatasetLogItem>, Fault> {
            self.inner.log(&params).await.map_err(Fault::from)
        }

        async fn fetch_entries(&self, params: RefListParams) -> Result<Vec<LogEntry>, Fault> {
            self.inner.logbook(&params).await.map_err(Fault::from)
        }

        async fn fetch_raw_logs(&self) -> Result<Vec<Log>, Fault> {
            self.inner.raw_logs().await.map_err(Fault::from)
        }
    }

    fn remote_over(repo: Arc<Repo>) -> LogRequests {
        LogRequests::remote(Arc::new(Loopback {
            inner: LogRequests::local(repo),
        }))
    }

    #[tokio::test]
    async fn log_lists_versions_newest_first() {
        let requests = LogRequests::local(seeded_repo());
        let items = requests
            .log(&LogParams::new("b5/population"))
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].path, Some(addr(b"v2")));
        assert_eq!(items[0].commit_title.as_deref(), Some("second"));
        assert_eq!(items[1].path, Some(addr(b"v1")));
        assert_eq!(items[0].alias, "b5/population");
    }

    #[tokio::test]
    async fn log_canonicalizes_me_alias() {
        let requests = LogRequests::local(seeded_repo());
        let items = requests.log(&LogParams::new("me/population")).await.unwrap();
        assert_eq!(items[0].alias, "b5/population");
    }

    #[tokio::test]
    async fn empty_and_invalid_references_fail_fast() {
        let requests = LogRequests::local(seeded_repo());

        let err = requests.log(&LogParams::new("")).await.unwrap_err();
        assert_eq!(err, RemoteError::EmptyReference);

        let err = requests
            .log(&LogParams::new("a/b/c"))
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn paging_is_clamped_before_dispatch() {
        let repo = Repo::open(SigningKey::generate(), "b5");
        let book = repo.logbook().unwrap();
        book.append(Op::init("big")).unwrap();
        for i in 0..40u32 {
            book.append(Op::commit("big", addr(&i.to_be_bytes()))).unwrap();
        }
        let requests = LogRequests::local(Arc::new(repo));

        let mut params = LogParams::new("b5/big");
        params.limit = 0;
        let page = requests.log(&params).await.unwrap();
        assert_eq!(page.len(), DEFAULT_PAGE_SIZE as usize);

        params.limit = 10;
        params.offset = -5;
        let from_negative = requests.log(&params).await.unwrap();
        params.offset = 0;
        let from_zero = requests.log(&params).await.unwrap();
        assert_eq!(from_negative, from_zero);
    }

    #[tokio::test]
    async fn logbook_requires_a_resolvable_reference() {
        let requests = LogRequests::local(seeded_repo());

        let entries = requests
            .logbook(&RefListParams::new("b5/population"))
            .await
            .unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].seq, 1);

        let err = requests
            .logbook(&RefListParams::new("b5/missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::RefNotFound(_)));
    }

    #[tokio::test]
    async fn detached_logbook_surfaces_configuration_error() {
        let repo = seeded_repo();
        repo.detach_logbook();
        let requests = LogRequests::local(Arc::clone(&repo));

        let err = requests
            .log(&LogParams::new("b5/population"))
            .await
            .unwrap_err();
        assert_eq!(err, RemoteError::NoLogbook);

        let err = requests.raw_logs().await.unwrap_err();
        assert_eq!(err, RemoteError::NoLogbook);
    }

    #[tokio::test]
    async fn raw_logs_can_be_cancelled_mid_export() {
        use std::time::Duration;

        let requests = LogRequests::local(seeded_repo());

        // A zero deadline expires at the first await point. The export
        // yields after every log, so the timeout drops the future before
        // it completes instead of running the export to the end.
        let cancelled = tokio::time::timeout(Duration::ZERO, requests.raw_logs()).await;
        assert!(cancelled.is_err());

        // Cancellation leaves nothing wedged; a fresh call exports fully.
        let logs = requests.raw_logs().await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].entries.len(), 3);
    }

    #[tokio::test]
    async fn remote_mode_matches_local_mode() {
        let repo = seeded_repo();
        let local = LogRequests::local(Arc::clone(&repo));
        let remote = remote_over(repo);

        let params = LogParams::new("b5/population");
        assert_eq!(
            local.log(&params).await.unwrap(),
            remote.log(&params).await.unwrap()
        );

        let params = RefListParams::new("b5/population");
        assert_eq!(
            local.logbook(&params).await.unwrap(),
            remote.logbook(&params).await.unwrap()
        );

        assert_eq!(
            local.raw_logs().await.unwrap(),
            remote.raw_logs().await.unwrap()
        );
    }

    #[tokio::test]
    async fn remote_mode_preserves_error_categories() {
        let remote = remote_over(seeded_repo());

        let err = remote.log(&LogParams::new("")).await.unwrap_err();
        assert_eq!(err, RemoteError::EmptyReference);

        let err = remote
            .logbook(&RefListParams::new("b5/missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::RefNotFound(_)));
    }
}
