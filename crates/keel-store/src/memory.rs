//! In-memory filesystem for tests and embedded nodes.

use std::collections::HashMap;
use std::sync::RwLock;

use tokio::sync::watch;
use tracing::debug;

use keel_types::ContentAddress;

use crate::error::{StoreError, StoreResult};
use crate::traits::Filesystem;

/// An in-memory implementation of [`Filesystem`].
///
/// Blocks live in a `HashMap` behind a `RwLock`. Data is lost when the
/// store is dropped. `close()` fires the completion signal consumed by the
/// repository shutdown join.
pub struct MemFilesystem {
    blocks: RwLock<HashMap<ContentAddress, Vec<u8>>>,
    closed: RwLock<bool>,
    done_tx: watch::Sender<bool>,
    done_err: RwLock<Option<StoreError>>,
}

impl MemFilesystem {
    /// Create a new empty filesystem.
    pub fn new() -> Self {
        let (done_tx, _) = watch::channel(false);
        Self {
            blocks: RwLock::new(HashMap::new()),
            closed: RwLock::new(false),
            done_tx,
            done_err: RwLock::new(None),
        }
    }

    /// Shut the filesystem down, recording the outcome and firing the
    /// completion signal. Closing twice keeps the first outcome.
    pub fn close(&self, result: StoreResult<()>) {
        {
            let mut closed = self.closed.write().expect("filesystem lock poisoned");
            if *closed {
                return;
            }
            *closed = true;
        }
        if let Err(err) = result {
            let mut slot = self.done_err.write().expect("filesystem lock poisoned");
            *slot = Some(err);
        }
        debug!("filesystem closed");
        // Receivers may all be gone already; that is not an error.
        let _ = self.done_tx.send(true);
    }

    /// Number of stored blocks.
    pub fn len(&self) -> usize {
        self.blocks.read().expect("filesystem lock poisoned").len()
    }

    /// Returns `true` if no blocks are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_open(&self) -> StoreResult<()> {
        if *self.closed.read().expect("filesystem lock poisoned") {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }
}

impl Default for MemFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemFilesystem {
    fn write(&self, data: &[u8]) -> StoreResult<ContentAddress> {
        self.check_open()?;
        let address = ContentAddress::for_content(data);
        let mut blocks = self.blocks.write().expect("filesystem lock poisoned");
        // Idempotent: the same bytes hash to the same address.
        blocks.entry(address).or_insert_with(|| data.to_vec());
        Ok(address)
    }

    fn read(&self, address: &ContentAddress) -> StoreResult<Option<Vec<u8>>> {
        self.check_open()?;
        let blocks = self.blocks.read().expect("filesystem lock poisoned");
        Ok(blocks.get(address).cloned())
    }

    fn has(&self, address: &ContentAddress) -> StoreResult<bool> {
        self.check_open()?;
        let blocks = self.blocks.read().expect("filesystem lock poisoned");
        Ok(blocks.contains_key(address))
    }

    fn done(&self) -> watch::Receiver<bool> {
        self.done_tx.subscribe()
    }

    fn done_err(&self) -> Option<StoreError> {
        self.done_err
            .read()
            .expect("filesystem lock poisoned")
            .clone()
    }
}
