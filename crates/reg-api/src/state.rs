//! Shared application state.
//!
//! Everything the handlers need is injected here at bootstrap — no
//! process-wide singletons. Storage, the actor directory, and the
//! snapshot cache are all explicit constructor arguments so tests can
//! swap any of them.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use sqlx::PgPool;

use reg_actor::ActorDirectory;
use reg_core::DomainName;
use reg_state::DomainLifecycleState;
use reg_store::{MemoryStateStore, PostgresStateStore, StateStore};

/// Shared state for the gateway.
///
/// `db_pool` is `None` in in-memory-only mode: the actors then persist
/// to a process-local store, and the relational mirror and audit trail
/// are skipped entirely.
#[derive(Clone)]
pub struct AppState {
    /// The actor directory — the only path to lifecycle mutation.
    pub directory: Arc<ActorDirectory>,
    /// Optional relational pool for the mirror and audit writers.
    pub db_pool: Option<PgPool>,
    /// Snapshot cache for `GET /state`. Populated only by the write
    /// paths via [`AppState::publish_snapshot`]; readers never insert,
    /// so a slow read can never resurrect a superseded record.
    pub snapshots: Arc<DashMap<DomainName, DomainLifecycleState>>,
}

impl AppState {
    /// In-memory-only mode: actors persist to a process-local store.
    /// State does not survive restarts. Used in development and tests.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStateStore::new()), None)
    }

    /// Durable mode: actors persist to Postgres, and the gateway
    /// maintains the relational mirror and audit trail on the same
    /// pool.
    pub fn with_pool(pool: PgPool) -> Self {
        Self::with_store(
            Arc::new(PostgresStateStore::new(pool.clone())),
            Some(pool),
        )
    }

    /// Build state over an explicit store. Exposed so tests can share
    /// one store across simulated restarts.
    pub fn with_store(store: Arc<dyn StateStore>, db_pool: Option<PgPool>) -> Self {
        Self {
            directory: Arc::new(ActorDirectory::new(store)),
            db_pool,
            snapshots: Arc::new(DashMap::new()),
        }
    }

    /// Publish a committed record to the snapshot cache.
    ///
    /// Write handlers call this after the actor has persisted. Two
    /// writers to the same domain serialize at the actor but can reach
    /// this point in either order, so the cache keeps whichever record
    /// carries the later `updated_at` and drops the other.
    pub fn publish_snapshot(&self, record: DomainLifecycleState) {
        match self.snapshots.entry(record.domain_name.clone()) {
            Entry::Occupied(mut slot) => {
                if record.updated_at >= slot.get().updated_at {
                    slot.insert(record);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
