//! # reg-api server entry point
//!
//! Boots the transition gateway: tracing, optional Postgres pool,
//! actor directory, and the Axum server.
//!
//! Configuration is environment-driven:
//! - `DATABASE_URL` — Postgres connection string; absent means
//!   in-memory-only mode.
//! - `REG_BIND_ADDR` — listen address (default `0.0.0.0:8080`).
//! - `REG_METRICS_ENABLED` — set to `false` to disable the metrics
//!   middleware and `/metrics` endpoint.
//! - `RUST_LOG` — tracing filter (default `info`).

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use reg_api::state::AppState;
use reg_api::{app, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let state = match db::init_pool().await.context("database initialization")? {
        Some(pool) => AppState::with_pool(pool),
        None => AppState::new(),
    };

    let app = app(state);

    let addr: SocketAddr = std::env::var("REG_BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        .parse()
        .context("parsing REG_BIND_ADDR")?;

    tracing::info!("reg-api listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("binding listener")?;
    axum::serve(listener, app.into_make_service())
        .await
        .context("server error")?;

    Ok(())
}
