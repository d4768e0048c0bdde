//! Keeps the persisted snapshot in step with the in-memory cart.
//!
//! The bridge loads the stored snapshot once at startup and, once attached to
//! a [`CartStore`], queues a save for every mutation. A single background task
//! drains the queue, so writes reach the store in the order the mutations
//! happened. Mutation callers never wait on I/O and never see save failures;
//! those are logged and the in-memory cart stays authoritative.

use std::sync::{Arc, Mutex, PoisonError};

use marketplace_cart_core::{Snapshot, SnapshotError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::kv::{KeyValueStore, StoreError};
use crate::store::CartStore;

/// Errors reading or writing the persisted snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// What happened when the persisted snapshot was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A snapshot was found and seeded into the cart.
    Restored { items: usize },
    /// Nothing was stored under the key; the cart stays empty.
    Missing,
    /// The store failed or held an unreadable value; the cart stays empty.
    Failed,
}

enum Command {
    Save(Arc<Snapshot>),
    Flush(oneshot::Sender<()>),
    Stop,
}

/// Loads and saves cart snapshots under a single key.
pub struct PersistenceBridge {
    store: Arc<dyn KeyValueStore>,
    key: String,
    queue: mpsc::UnboundedSender<Command>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for PersistenceBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceBridge")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl PersistenceBridge {
    /// Create a bridge for `key` and start its save worker.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let (queue, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(Arc::clone(&store), key.clone(), rx));

        Self {
            store,
            key,
            queue,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// The key snapshots are stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the persisted snapshot and seed it into `cart`.
    ///
    /// Should run before the cart is handed out: a mutation made before the
    /// load finishes would be overwritten by it.
    #[instrument(skip(self, cart), fields(key = %self.key))]
    pub async fn load(&self, cart: &CartStore) -> LoadOutcome {
        match read_snapshot(self.store.as_ref(), &self.key).await {
            Ok(Some(snapshot)) => {
                let items = snapshot.len();
                cart.seed(snapshot);
                info!(items, "Restored persisted cart");
                LoadOutcome::Restored { items }
            }
            Ok(None) => {
                info!("No persisted cart found, starting empty");
                LoadOutcome::Missing
            }
            Err(e) => {
                warn!(error = %e, "Failed to load persisted cart, starting empty");
                LoadOutcome::Failed
            }
        }
    }

    /// Queue a save for every future mutation of `cart`.
    pub fn attach(&self, cart: &CartStore) {
        let queue = self.queue.clone();
        cart.observe(Box::new(move |snapshot: &Arc<Snapshot>| {
            if queue.send(Command::Save(Arc::clone(snapshot))).is_err() {
                warn!("Persistence worker stopped, cart change not saved");
            }
        }));
    }

    /// Wait until every save queued before this call has been attempted.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.queue.send(Command::Flush(done)).is_err() {
            return;
        }
        // A dropped sender means the worker already exited.
        let _ = wait.await;
    }

    /// Finish queued saves and stop the worker.
    ///
    /// Mutations after this point are no longer persisted.
    pub async fn shutdown(&self) {
        let _ = self.queue.send(Command::Stop);
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = worker
            && let Err(e) = worker.await
        {
            error!(error = %e, "Persistence worker panicked");
        }
    }
}

async fn read_snapshot(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<Snapshot>, PersistenceError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    Ok(Some(Snapshot::from_json(&raw)?))
}

#[instrument(skip(store, snapshot), fields(items = snapshot.len()))]
async fn write_snapshot(
    store: &dyn KeyValueStore,
    key: &str,
    snapshot: &Snapshot,
) -> Result<(), PersistenceError> {
    let raw = snapshot.to_json()?;
    store.set(key, raw).await?;
    debug!("Saved cart snapshot");
    Ok(())
}

async fn run_worker(
    store: Arc<dyn KeyValueStore>,
    key: String,
    mut rx: mpsc::UnboundedReceiver<Command>,
) {
    debug!(key = %key, "Persistence worker started");
    while let Some(command) = rx.recv().await {
        match command {
            Command::Save(snapshot) => {
                if let Err(e) = write_snapshot(store.as_ref(), &key, &snapshot).await {
                    error!(key = %key, error = %e, "Failed to save cart snapshot");
                }
            }
            Command::Flush(done) => {
                let _ = done.send(());
            }
            Command::Stop => break,
        }
    }
    debug!(key = %key, "Persistence worker stopped");
}
