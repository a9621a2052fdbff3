//! Ordered write-behind persistence.
//!
//! State changes are serialized on the caller's side and queued; a single
//! background task applies them to the store in queue order. Callers never
//! wait for a write unless they ask to with [`Persister::flush`]. Failed
//! writes are logged and dropped, leaving the in-memory state authoritative.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::storage::KeyValueStore;

#[derive(Debug)]
enum Command {
    Write { key: String, value: String },
    Flush(oneshot::Sender<()>),
}

/// Handle to the background writer.
///
/// Dropping the handle lets the writer drain what is queued and exit. Must be
/// created inside a Tokio runtime.
#[derive(Debug)]
pub struct Persister {
    tx: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl Persister {
    /// Spawn a writer for `store`.
    #[must_use]
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(store, rx));
        Self { tx, task }
    }

    /// Queue `value` for `key`. The value is encoded now, so later changes to
    /// the caller's state do not affect this write.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be encoded or the writer is gone.
    pub fn enqueue<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_string(value)?;
        trace!(key, bytes = value.len(), "Queueing write");
        self.tx
            .send(Command::Write {
                key: key.to_string(),
                value,
            })
            .map_err(|_| Error::PersisterClosed)
    }

    /// Wait until every write queued before this call has been attempted.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer is gone.
    pub async fn flush(&self) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(Command::Flush(done_tx))
            .map_err(|_| Error::PersisterClosed)?;
        done_rx.await.map_err(|_| Error::PersisterClosed)
    }

    /// Flush, then stop the writer and wait for it to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer task panicked.
    pub async fn shutdown(self) -> Result<()> {
        let Self { tx, task } = self;
        drop(tx);
        task.await
            .map_err(|e| Error::internal(format!("persistence task failed: {e}")))
    }
}

async fn run(store: Arc<dyn KeyValueStore>, mut rx: mpsc::UnboundedReceiver<Command>) {
    debug!(store = store.name(), "Persistence writer started");
    while let Some(command) = rx.recv().await {
        match command {
            Command::Write { key, value } => {
                if let Err(e) = store.set_raw(&key, value).await {
                    warn!(key = %key, error = %e, "Failed to persist value");
                }
            }
            Command::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Persistence writer stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::storage::{MemoryStore, TypedStore};

    /// Records every write it receives, failing on a chosen key.
    #[derive(Debug, Default)]
    struct RecordingStore {
        writes: Mutex<Vec<(String, String)>>,
        fail_key: Option<&'static str>,
    }

    #[async_trait]
    impl KeyValueStore for RecordingStore {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn get_raw(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn set_raw(&self, key: &str, value: String) -> Result<()> {
            if self.fail_key == Some(key) {
                return Err(Error::internal("disk on fire"));
            }
            self.writes.lock().unwrap().push((key.to_string(), value));
            Ok(())
        }

        async fn remove(&self, _key: &str) -> Result<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_writes_apply_in_order() {
        let store = Arc::new(RecordingStore::default());
        let persister = Persister::spawn(store.clone());

        for i in 0..20 {
            persister.enqueue("counter", &i).unwrap();
        }
        persister.flush().await.unwrap();

        let writes = store.writes.lock().unwrap();
        let values: Vec<String> = writes.iter().map(|(_, v)| v.clone()).collect();
        let expected: Vec<String> = (0..20).map(|i: i32| i.to_string()).collect();
        assert_eq!(values, expected);
    }

    #[tokio::test]
    async fn test_value_is_snapshot_at_enqueue() {
        let store = Arc::new(MemoryStore::new());
        let persister = Persister::spawn(store.clone());

        let mut favorites = vec!["a".to_string()];
        persister.enqueue("favs", &favorites).unwrap();
        favorites.push("b".to_string());
        persister.flush().await.unwrap();

        let stored: Vec<String> = store.get_or("favs", Vec::new()).await.unwrap();
        assert_eq!(stored, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_write_is_swallowed() {
        let store = Arc::new(RecordingStore {
            fail_key: Some("bad"),
            ..RecordingStore::default()
        });
        let persister = Persister::spawn(store.clone());

        persister.enqueue("bad", &1).unwrap();
        persister.enqueue("good", &2).unwrap();
        persister.flush().await.unwrap();

        let writes = store.writes.lock().unwrap();
        assert_eq!(writes.as_slice(), &[("good".to_string(), "2".to_string())]);
    }

    #[tokio::test]
    async fn test_shutdown_drains_queue() {
        let store = Arc::new(MemoryStore::new());
        let persister = Persister::spawn(store.clone());

        persister.enqueue("k", "v").unwrap();
        persister.shutdown().await.unwrap();

        let stored: String = store.get_or("k", String::new()).await.unwrap();
        assert_eq!(stored, "v");
    }
}
