//! Observation Store
//!
//! The single source of truth for observation and recommendation state.
//! State lives in a `tokio::sync::watch` channel: readers borrow the latest
//! committed value synchronously and subscribers are woken on every applied
//! action. Every transition is committed to the snapshot slot before the
//! write lock is released, so snapshots land in dispatch order.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

use super::action::{reduce, Action};
use super::observation::ObservationState;
use crate::storage::{StorageError, StorageResult, SnapshotStorage};

/// Shared observation state container
pub struct ObservationStore {
    tx: watch::Sender<ObservationState>,
    storage: Arc<dyn SnapshotStorage>,
    stats: Mutex<StoreStats>,
}

/// Commit bookkeeping for health reporting
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    /// Actions applied since startup
    pub actions_applied: u64,
    /// Snapshot writes that failed
    pub failed_commits: u64,
    /// Time of the last successful snapshot write
    pub last_commit: Option<DateTime<Utc>>,
    /// Message of the most recent failed write, cleared on success
    pub last_commit_error: Option<String>,
}

impl ObservationStore {
    /// Create a store whose initial state is read from `storage`
    ///
    /// A missing or unreadable snapshot yields the default state.
    pub fn load(storage: Arc<dyn SnapshotStorage>) -> Self {
        let initial = load_initial_state(storage.as_ref());
        Self::with_state(initial, storage)
    }

    /// Create a store with an explicit initial state
    pub fn with_state(initial: ObservationState, storage: Arc<dyn SnapshotStorage>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            storage,
            stats: Mutex::new(StoreStats::default()),
        }
    }

    /// Latest committed state
    pub fn snapshot(&self) -> ObservationState {
        self.tx.borrow().clone()
    }

    /// Receive a notification after every applied action
    ///
    /// The receiver starts with the current state marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<ObservationState> {
        self.tx.subscribe()
    }

    /// Apply one action, notify subscribers, and commit the snapshot
    ///
    /// Unknown actions leave the state untouched and are not committed.
    /// The snapshot write is synchronous and blocks the caller.
    pub fn dispatch(&self, action: Action) {
        if !action.is_known() {
            tracing::debug!(action = %action.name(), "Ignoring unknown action");
            return;
        }

        tracing::trace!(action = %action.name(), "Dispatching action");

        self.tx.send_modify(|state| {
            *state = reduce(state, action);
            self.commit(state);
        });
    }

    /// Apply several actions in order and return the resulting state
    pub fn dispatch_all(&self, actions: impl IntoIterator<Item = Action>) -> ObservationState {
        for action in actions {
            self.dispatch(action);
        }
        self.snapshot()
    }

    /// Snapshot slot backing this store
    pub fn storage(&self) -> &Arc<dyn SnapshotStorage> {
        &self.storage
    }

    /// Commit bookkeeping
    pub fn stats(&self) -> StoreStats {
        self.stats
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// Best-effort snapshot write; failures are logged and counted
    fn commit(&self, state: &ObservationState) {
        let result = write_snapshot(self.storage.as_ref(), state);

        let Ok(mut stats) = self.stats.lock() else {
            return;
        };
        stats.actions_applied += 1;

        match result {
            Ok(()) => {
                stats.last_commit = Some(Utc::now());
                stats.last_commit_error = None;
            }
            Err(e) => {
                stats.failed_commits += 1;
                stats.last_commit_error = Some(e.to_string());
                tracing::warn!(
                    key = %self.storage.key(),
                    error = %e,
                    "Failed to persist observation state"
                );
            }
        }
    }
}

/// Read the initial state from a snapshot slot
///
/// Falls back to the default state when the slot is empty, unreadable,
/// or holds something that does not parse.
pub fn load_initial_state(storage: &dyn SnapshotStorage) -> ObservationState {
    match storage.read() {
        Ok(Some(raw)) => match ObservationState::from_snapshot(&raw) {
            Ok(state) => {
                tracing::info!(key = %storage.key(), "Loaded saved observation state");
                state
            }
            Err(e) => {
                tracing::warn!(
                    key = %storage.key(),
                    error = %e,
                    "Saved observation state is corrupt, starting from defaults"
                );
                ObservationState::default()
            }
        },
        Ok(None) => {
            tracing::debug!(key = %storage.key(), "No saved observation state");
            ObservationState::default()
        }
        Err(e) => {
            tracing::warn!(
                key = %storage.key(),
                error = %e,
                "Failed to read saved observation state, starting from defaults"
            );
            ObservationState::default()
        }
    }
}

fn write_snapshot(storage: &dyn SnapshotStorage, state: &ObservationState) -> StorageResult<()> {
    let snapshot = state.to_snapshot().map_err(StorageError::from)?;
    storage.write(&snapshot)
}
