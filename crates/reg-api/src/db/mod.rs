//! # Database Persistence Layer
//!
//! Postgres persistence via SQLx. The database is **optional**: when
//! `DATABASE_URL` is set, actors persist their lifecycle records to
//! the `domain_lifecycle` table and the gateway mirrors state into the
//! relational `domains` and `domain_transitions` tables. When absent,
//! the control plane runs in in-memory-only mode (development and
//! testing) and state does not survive restarts.
//!
//! Only the actor's `domain_lifecycle` record is authoritative; the
//! mirror and audit tables are best-effort read models.

pub mod domains;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running in-memory only mode. \
                 Lifecycle state will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    // Run embedded migrations.
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}
