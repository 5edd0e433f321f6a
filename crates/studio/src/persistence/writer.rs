//! Ordered fire-and-forget snapshot writes.

use std::sync::Arc;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

use super::{SnapshotKey, SnapshotStore};

enum Command {
    Save { key: SnapshotKey, payload: String },
    Flush(oneshot::Sender<()>),
}

/// Handle to the background task that writes snapshots.
///
/// Snapshots are serialized when queued, so each write captures the state at
/// the moment of the change. A single task drains the queue, so writes reach
/// the backend in queue order. Failures are logged and dropped.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    tx: mpsc::UnboundedSender<Command>,
}

impl SnapshotWriter {
    /// Start the writer task on `runtime`.
    #[must_use]
    pub fn spawn(runtime: &Handle, store: Arc<dyn SnapshotStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();

        runtime.spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    Command::Save { key, payload } => {
                        if let Err(e) = store.save(key.storage_key(), &payload).await {
                            tracing::warn!(snapshot = %key, error = %e, "Failed to save snapshot");
                        }
                    }
                    Command::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            tracing::debug!("Snapshot writer stopped");
        });

        Self { tx }
    }

    /// Queue a snapshot of `value` under `key`.
    pub fn save<T>(&self, key: SnapshotKey, value: &T)
    where
        T: Serialize + ?Sized,
    {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(snapshot = %key, error = %e, "Failed to encode snapshot");
                return;
            }
        };
        if self.tx.send(Command::Save { key, payload }).is_err() {
            tracing::warn!(snapshot = %key, "Snapshot writer is gone, dropping write");
        }
    }

    /// Wait until every write queued before this call has finished.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(Command::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::persistence::MemorySnapshotStore;

    #[tokio::test]
    async fn test_writes_land_in_order() {
        let store = MemorySnapshotStore::new();
        let writer = SnapshotWriter::spawn(&Handle::current(), Arc::new(store.clone()));

        writer.save(SnapshotKey::ActiveId, &Some("a"));
        writer.save(SnapshotKey::ActiveId, &Some("b"));
        writer.save(SnapshotKey::ActiveId, &Some("c"));
        writer.flush().await;

        assert_eq!(
            store.get(SnapshotKey::ActiveId.storage_key()).as_deref(),
            Some("\"c\"")
        );
    }

    #[tokio::test]
    async fn test_snapshot_taken_at_queue_time() {
        let store = MemorySnapshotStore::new();
        let writer = SnapshotWriter::spawn(&Handle::current(), Arc::new(store.clone()));

        let mut names = vec!["Alpha".to_string()];
        writer.save(SnapshotKey::Stores, &names);
        names.push("Beta".to_string());
        writer.flush().await;

        assert_eq!(
            store.get(SnapshotKey::Stores.storage_key()).as_deref(),
            Some(r#"["Alpha"]"#)
        );
    }
}
