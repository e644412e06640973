//! In-memory state store for development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use reg_core::DomainName;
use reg_state::DomainLifecycleState;

use crate::{StateStore, StoreError};

/// A [`StateStore`] backed by a process-local map.
///
/// Used when `DATABASE_URL` is absent (state does not survive process
/// restarts) and throughout the test suites. Records are stored as
/// serialized JSON, not live objects, so the store exercises the same
/// encode/decode boundary as the Postgres implementation — a record
/// that does not round-trip fails here too, not only in production.
#[derive(Default)]
pub struct MemoryStateStore {
    records: RwLock<HashMap<DomainName, serde_json::Value>>,
}

impl MemoryStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, key: &DomainName) -> Result<Option<DomainLifecycleState>, StoreError> {
        let blob = self.records.read().get(key).cloned();
        match blob {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &DomainName, record: &DomainLifecycleState) -> Result<(), StoreError> {
        // Serialize before taking the lock; a failed encode leaves the
        // prior value in place.
        let value = serde_json::to_value(record)?;
        self.records.write().insert(key.clone(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reg_core::DomainId;
    use reg_state::DomainState;

    fn record(name: &str) -> (DomainName, DomainLifecycleState) {
        let name = DomainName::new(name).unwrap();
        let record = DomainLifecycleState::new(DomainId::new("d1").unwrap(), name.clone());
        (name, record)
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = MemoryStateStore::new();
        let name = DomainName::new("example.com").unwrap();
        assert!(store.get(&name).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_then_get_roundtrips() {
        let store = MemoryStateStore::new();
        let (name, mut rec) = record("example.com");
        rec.apply(DomainState::Registered, "api", None).unwrap();

        store.put(&name, &rec).await.unwrap();
        let loaded = store.get(&name).await.unwrap().unwrap();
        assert_eq!(loaded, rec);
    }

    #[tokio::test]
    async fn put_replaces_prior_value() {
        let store = MemoryStateStore::new();
        let (name, mut rec) = record("example.com");
        store.put(&name, &rec).await.unwrap();

        rec.apply(DomainState::Registered, "api", None).unwrap();
        store.put(&name, &rec).await.unwrap();

        let loaded = store.get(&name).await.unwrap().unwrap();
        assert_eq!(loaded.current_state, DomainState::Registered);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn keys_are_isolated() {
        let store = MemoryStateStore::new();
        let (a, rec_a) = record("a.com");
        let (b, rec_b) = record("b.com");

        store.put(&a, &rec_a).await.unwrap();
        store.put(&b, &rec_b).await.unwrap();

        assert_eq!(
            store.get(&a).await.unwrap().unwrap().domain_name.as_str(),
            "a.com"
        );
        assert_eq!(
            store.get(&b).await.unwrap().unwrap().domain_name.as_str(),
            "b.com"
        );
    }
}
