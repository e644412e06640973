//! # reg-store — Durable Per-Domain State Storage
//!
//! One record per domain name, keyed by that name, read and written by
//! exactly one actor instance. The [`StateStore`] trait is the seam:
//! the actor layer depends on it, the gateway chooses an
//! implementation at bootstrap.
//!
//! ## Guarantees
//!
//! - A `put` that returns `Ok` is durable: later `get`s for the same
//!   key observe it, including after the owning actor restarts.
//! - A `put` that fails leaves the previously stored value intact —
//!   both implementations write atomically, never partially.
//! - Failures are surfaced as [`StoreError`], never swallowed.

pub mod error;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use reg_core::DomainName;
use reg_state::DomainLifecycleState;

pub use error::StoreError;
pub use memory::MemoryStateStore;
pub use postgres::PostgresStateStore;

/// Key-addressed durable storage of one lifecycle record per domain.
///
/// Each key's record is scoped privately to that domain's actor
/// instance; no cross-instance reads occur at this layer.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Fetch the stored record for `key`, if one exists.
    async fn get(&self, key: &DomainName) -> Result<Option<DomainLifecycleState>, StoreError>;

    /// Durably store `record` under `key`, replacing any prior value.
    async fn put(&self, key: &DomainName, record: &DomainLifecycleState) -> Result<(), StoreError>;
}
