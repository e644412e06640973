//! Postgres-backed state store.
//!
//! One JSONB row per domain in the `domain_lifecycle` table. The whole
//! record travels as a single value and every write is one
//! `INSERT ... ON CONFLICT DO UPDATE` statement, so a failed write
//! never leaves a partially updated row — the previous record stays
//! intact and the error is surfaced to the owning actor.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use reg_core::DomainName;
use reg_state::DomainLifecycleState;

use crate::{StateStore, StoreError};

/// A [`StateStore`] persisting each domain's record to Postgres.
#[derive(Clone)]
pub struct PostgresStateStore {
    pool: PgPool,
}

impl PostgresStateStore {
    /// Wrap an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StateStore for PostgresStateStore {
    async fn get(&self, key: &DomainName) -> Result<Option<DomainLifecycleState>, StoreError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT record FROM domain_lifecycle WHERE domain_name = $1")
                .bind(key.as_str())
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((value,)) => {
                // A row that fails to decode is corruption, not absence.
                // Defaulting here would fabricate lifecycle state, so the
                // error propagates to the owning actor instead.
                let record = serde_json::from_value(value).map_err(|e| {
                    tracing::error!(domain = %key, error = %e, "stored lifecycle record failed to decode");
                    StoreError::Serialization(e)
                })?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &DomainName, record: &DomainLifecycleState) -> Result<(), StoreError> {
        let value = serde_json::to_value(record)?;

        sqlx::query(
            "INSERT INTO domain_lifecycle (domain_name, record, updated_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (domain_name)
             DO UPDATE SET record = EXCLUDED.record, updated_at = EXCLUDED.updated_at",
        )
        .bind(key.as_str())
        .bind(&value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
