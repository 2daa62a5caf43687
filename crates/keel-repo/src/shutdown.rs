//! Shutdown aggregation across repository subsystems.
//!
//! Each subsystem with a teardown phase exposes a completion signal. The
//! repository joins them into a single signal that fires exactly once,
//! after every subsystem has finished. Errors are collected first-wins:
//! the earliest failing subsystem in declaration order is the one
//! reported.

use tokio::sync::watch;
use tracing::debug;

use crate::error::RepoError;

/// One subsystem's completion signal, paired with a probe for its
/// terminal error.
pub(crate) struct Subsystem {
    pub name: &'static str,
    pub done: watch::Receiver<bool>,
    pub error: Box<dyn Fn() -> Option<RepoError> + Send + Sync>,
}

impl Subsystem {
    pub fn new(
        name: &'static str,
        done: watch::Receiver<bool>,
        error: impl Fn() -> Option<RepoError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            done,
            error: Box::new(error),
        }
    }
}

/// Spawn a task that waits for every subsystem, then fires the returned
/// receiver exactly once. Must be called from within a tokio runtime.
pub(crate) fn join_all(subsystems: Vec<Subsystem>) -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        for mut subsystem in subsystems {
            // wait_for returns immediately if the signal already fired;
            // a dropped sender counts as completed.
            let _ = subsystem.done.wait_for(|fired| *fired).await;
            debug!(subsystem = subsystem.name, "subsystem finished");
        }
        let _ = tx.send(true);
    });
    rx
}

/// First error across subsystems, in declaration order.
pub(crate) fn first_error(subsystems: &[Subsystem]) -> Option<RepoError> {
    subsystems.iter().find_map(|s| (s.error)())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subsystem(
        name: &'static str,
        error: Option<RepoError>,
    ) -> (watch::Sender<bool>, Subsystem) {
        let (tx, rx) = watch::channel(false);
        (tx, Subsystem::new(name, rx, move || error.clone()))
    }

    #[tokio::test]
    async fn joined_signal_waits_for_every_subsystem() {
        let (tx_a, a) = subsystem("a", None);
        let (tx_b, b) = subsystem("b", None);
        let mut done = join_all(vec![a, b]);

        assert!(!*done.borrow());
        tx_a.send(true).unwrap();
        tokio::task::yield_now().await;
        assert!(!*done.borrow());

        tx_b.send(true).unwrap();
        done.wait_for(|fired| *fired).await.unwrap();
    }

    #[tokio::test]
    async fn first_error_follows_declaration_order() {
        let early = RepoError::Shutdown {
            subsystem: "a",
            reason: "broke first".into(),
        };
        let late = RepoError::Shutdown {
            subsystem: "b",
            reason: "broke too".into(),
        };
        let (_tx_a, a) = subsystem("a", Some(early.clone()));
        let (_tx_b, b) = subsystem("b", Some(late));

        assert_eq!(first_error(&[a, b]), Some(early));
    }

    #[tokio::test]
    async fn dropped_sender_counts_as_completed() {
        let (tx, sub) = subsystem("a", None);
        drop(tx);
        let mut done = join_all(vec![sub]);
        // The join must not hang on a sender that will never fire.
        tokio::time::timeout(std::time::Duration::from_secs(1), done.wait_for(|f| *f))
            .await
            .unwrap()
            .unwrap();
    }
}
