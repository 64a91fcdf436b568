//! Write-behind persistence of collection snapshots.
//!
//! Submissions go through a `watch` channel, so a burst of mutations collapses
//! into a single save of the newest snapshot. Saves run on the blocking pool.
//! A failed save is retried a bounded number of times and abandoned as soon as
//! a newer snapshot is waiting.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::snapshot::save_identities;
use super::KeyValueStore;
use crate::model::Snapshot;

/// Attempts per snapshot, first try included.
pub const MAX_SAVE_ATTEMPTS: u32 = 3;

const RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Background writer owning the persistence task.
pub struct SnapshotWriter {
    tx: Option<watch::Sender<Snapshot>>,
    task: Option<JoinHandle<()>>,
}

impl SnapshotWriter {
    /// Spawn the writer task. `current` is treated as already persisted.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(store: Arc<dyn KeyValueStore>, current: Snapshot) -> Self {
        let (tx, rx) = watch::channel(current);
        let task = tokio::spawn(run(store, rx));
        Self {
            tx: Some(tx),
            task: Some(task),
        }
    }

    /// Queue `snapshot` for saving, replacing anything not yet written.
    pub fn submit(&self, snapshot: Snapshot) {
        if let Some(tx) = &self.tx {
            tx.send_replace(snapshot);
        }
    }

    /// Stop accepting snapshots and wait until the last one is written.
    pub async fn close(mut self) {
        self.tx.take();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "snapshot writer task failed");
            }
        }
    }
}

async fn run(store: Arc<dyn KeyValueStore>, mut rx: watch::Receiver<Snapshot>) {
    // An unseen value is still delivered after the sender is dropped.
    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        save_with_retry(&store, &rx, snapshot).await;
    }
    debug!("snapshot writer stopped");
}

async fn save_with_retry(
    store: &Arc<dyn KeyValueStore>,
    rx: &watch::Receiver<Snapshot>,
    snapshot: Snapshot,
) {
    for attempt in 1..=MAX_SAVE_ATTEMPTS {
        let store = Arc::clone(store);
        let data = Arc::clone(&snapshot);
        let result = tokio::task::spawn_blocking(move || save_identities(&*store, &data)).await;

        match result {
            Ok(Ok(())) => return,
            Ok(Err(e)) => warn!(attempt, error = %e, "failed to persist collection"),
            Err(e) => warn!(attempt, error = %e, "persist task panicked"),
        }

        if matches!(rx.has_changed(), Ok(true)) {
            debug!("newer snapshot pending, dropping failed one");
            return;
        }
        if attempt < MAX_SAVE_ATTEMPTS {
            tokio::time::sleep(RETRY_BACKOFF * attempt).await;
        }
    }
    warn!(
        attempts = MAX_SAVE_ATTEMPTS,
        "giving up on snapshot; in-memory state stays authoritative"
    );
}
