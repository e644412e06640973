//! The per-domain lifecycle actor.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use reg_core::{DomainId, DomainName};
use reg_state::{DomainLifecycleState, DomainState, TransitionRecord, TransitionResult};
use reg_store::{StateStore, StoreError};

/// Errors from actor operations.
///
/// Policy rejections are NOT errors — they come back as a
/// [`TransitionResult`] with `success: false`. Only infrastructure
/// failures surface here, and they are always safe to retry: a failed
/// operation left no partial mutation behind.
#[derive(Error, Debug)]
pub enum ActorError {
    /// The durable store failed; no state was mutated.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A transition request as the actor receives it.
#[derive(Debug, Clone)]
pub struct TransitionCommand {
    /// Identifier used if the domain must be auto-initialized first.
    pub domain_id: DomainId,
    /// The requested target state.
    pub to_state: DomainState,
    /// Who asked for this transition.
    pub triggered_by: String,
    /// Optional free-text reason.
    pub reason: Option<String>,
}

/// The cell an actor's mutex guards: the record (if any) plus a flag
/// recording whether the store has been consulted yet. `hydrated` with
/// `state: None` means "checked the store, domain never initialized" —
/// distinct from "not checked yet".
#[derive(Debug, Default)]
struct Cell {
    hydrated: bool,
    state: Option<DomainLifecycleState>,
}

/// The single logical owner of one domain's lifecycle state.
///
/// All four operations take the instance mutex for their full
/// duration, store I/O included. tokio's `Mutex` queues waiters FIFO,
/// so requests to one domain are processed one at a time in arrival
/// order — no reordering, no second request evaluated against a stale
/// snapshot while the first is suspended on I/O.
///
/// Mutation follows persist-then-commit: the updated record is written
/// to the store first and installed in memory only after the write
/// succeeds, so the in-memory view and the durable view never diverge.
pub struct DomainActor {
    name: DomainName,
    store: Arc<dyn StateStore>,
    cell: Mutex<Cell>,
}

impl DomainActor {
    /// Create an actor for `name`. The store is not consulted until
    /// the first operation (lazy hydration).
    pub fn new(name: DomainName, store: Arc<dyn StateStore>) -> Self {
        Self {
            name,
            store,
            cell: Mutex::new(Cell::default()),
        }
    }

    /// The domain name this actor owns.
    pub fn name(&self) -> &DomainName {
        &self.name
    }

    /// Load the record from the store if this instance has not yet
    /// done so. Called with the cell lock held.
    async fn hydrate(&self, cell: &mut Cell) -> Result<(), ActorError> {
        if !cell.hydrated {
            cell.state = self.store.get(&self.name).await?;
            cell.hydrated = true;
            if cell.state.is_some() {
                tracing::debug!(domain = %self.name, "rehydrated lifecycle record from store");
            }
        }
        Ok(())
    }

    /// (Re)initialize the domain: `Available`, empty history, fresh
    /// timestamps. Persisted before the in-memory record is replaced.
    ///
    /// **Reset semantics, not create-if-absent**: calling this on an
    /// already-initialized domain discards its state and history and
    /// starts over. The relational audit trail kept by the gateway is
    /// where prior history survives a reset.
    pub async fn initialize(&self, domain_id: DomainId) -> Result<DomainLifecycleState, ActorError> {
        let mut cell = self.cell.lock().await;

        let fresh = DomainLifecycleState::new(domain_id, self.name.clone());
        self.store.put(&self.name, &fresh).await?;

        cell.state = Some(fresh.clone());
        cell.hydrated = true;
        tracing::info!(domain = %self.name, domain_id = %fresh.domain_id, "domain initialized");
        Ok(fresh)
    }

    /// Current snapshot, or `None` if the domain was never
    /// initialized. No side effects.
    pub async fn state(&self) -> Result<Option<DomainLifecycleState>, ActorError> {
        let mut cell = self.cell.lock().await;
        self.hydrate(&mut cell).await?;
        Ok(cell.state.clone())
    }

    /// Transition history, oldest first. Empty if never initialized.
    pub async fn history(&self) -> Result<Vec<TransitionRecord>, ActorError> {
        let mut cell = self.cell.lock().await;
        self.hydrate(&mut cell).await?;
        Ok(cell
            .state
            .as_ref()
            .map(|s| s.history.clone())
            .unwrap_or_default())
    }

    /// Request a state transition.
    ///
    /// An uninitialized domain is auto-initialized to `Available`
    /// first and the fresh record is persisted — even if the requested
    /// transition is then rejected. This mirrors the long-standing
    /// behavior callers depend on, but note the footgun: it silently
    /// masks a forgotten `initialize` call, so the only symptom of
    /// that bug is a domain whose record appeared "by itself".
    ///
    /// Policy rejections return `Ok` with `success: false` and leave
    /// state and history untouched. A store failure returns `Err` and
    /// likewise leaves the in-memory record exactly as it was.
    pub async fn transition(&self, cmd: TransitionCommand) -> Result<TransitionResult, ActorError> {
        let mut cell = self.cell.lock().await;
        self.hydrate(&mut cell).await?;

        if cell.state.is_none() {
            let fresh = DomainLifecycleState::new(cmd.domain_id.clone(), self.name.clone());
            self.store.put(&self.name, &fresh).await?;
            cell.state = Some(fresh);
            tracing::info!(domain = %self.name, "domain auto-initialized on first transition");
        }

        let current = cell.state.as_ref().expect("initialized above");
        let from_state = current.current_state;

        if !from_state.can_transition_to(cmd.to_state) {
            let result = TransitionResult::rejected(from_state, cmd.to_state, chrono::Utc::now());
            tracing::debug!(
                domain = %self.name,
                from = %from_state,
                to = %cmd.to_state,
                "transition rejected by policy"
            );
            return Ok(result);
        }

        // Apply to a working copy, persist it, and only then commit it
        // in memory. If the put fails, `cell.state` still holds the
        // old record and the durable row was left intact by the store.
        let mut updated = current.clone();
        updated
            .apply(cmd.to_state, cmd.triggered_by, cmd.reason)
            .expect("edge validated above");
        let timestamp = updated.updated_at;

        self.store.put(&self.name, &updated).await?;
        cell.state = Some(updated);

        tracing::info!(
            domain = %self.name,
            from = %from_state,
            to = %cmd.to_state,
            "transition applied"
        );
        Ok(TransitionResult::applied(from_state, cmd.to_state, timestamp))
    }
}
