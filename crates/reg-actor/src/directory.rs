//! The name-to-actor directory.

use std::sync::Arc;

use dashmap::DashMap;

use reg_core::DomainName;
use reg_store::StateStore;

use crate::actor::DomainActor;

/// Resolves a domain name to the single [`DomainActor`] instance
/// responsible for it, creating the instance on first reference and
/// reusing it for the lifetime of the process.
///
/// Resolution goes through the map's entry API, so two concurrent
/// `resolve` calls for the same name observe exactly one instance —
/// never two live actors for one domain. Actors hydrate themselves
/// from the shared store on first use, so a fresh process (or a fresh
/// directory over an existing store) transparently picks up persisted
/// state.
///
/// There is deliberately no eviction: removing an entry while an
/// in-flight operation still holds a clone of the actor `Arc` would
/// allow a second live instance for the same name — two concurrent
/// writers to one record.
pub struct ActorDirectory {
    store: Arc<dyn StateStore>,
    actors: DashMap<DomainName, Arc<DomainActor>>,
}

impl ActorDirectory {
    /// Create a directory over the given store.
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            actors: DashMap::new(),
        }
    }

    /// Resolve `name` to its actor, creating it on first reference.
    pub fn resolve(&self, name: &DomainName) -> Arc<DomainActor> {
        self.actors
            .entry(name.clone())
            .or_insert_with(|| {
                tracing::debug!(domain = %name, "creating lifecycle actor");
                Arc::new(DomainActor::new(name.clone(), self.store.clone()))
            })
            .clone()
    }

    /// Number of live actor instances (resident in this process).
    pub fn resident(&self) -> usize {
        self.actors.len()
    }
}
