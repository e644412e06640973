//! # reg-api — Transition Gateway for the Domain Lifecycle Registry
//!
//! Stateless HTTP surface in front of the actor directory. Every
//! lifecycle mutation for a domain name is routed through the single
//! actor that owns that name, so the gateway itself holds no lifecycle
//! state worth protecting.
//!
//! ## API Surface
//!
//! | Route                              | Method | Purpose                    |
//! |------------------------------------|--------|----------------------------|
//! | `/v1/domains/:name/initialize`     | POST   | Create or reset a record   |
//! | `/v1/domains/:name/state`          | GET    | Current lifecycle state    |
//! | `/v1/domains/:name/history`        | GET    | Applied transitions        |
//! | `/v1/domains/:name/transition`     | POST   | Request a transition       |
//! | `/health/liveness`                 | GET    | Process liveness           |
//! | `/health/readiness`                | GET    | Dependency readiness       |
//! | `/metrics`                         | GET    | Prometheus scrape          |
//! | `/openapi.json`                    | GET    | Generated OpenAPI spec     |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```

pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Check if metrics are enabled via the `REG_METRICS_ENABLED` env var.
/// Defaults to `true` when the variable is absent or set to anything
/// other than `"false"`.
fn metrics_enabled() -> bool {
    std::env::var("REG_METRICS_ENABLED")
        .map(|v| v.to_lowercase() != "false")
        .unwrap_or(true)
}

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();
    let metrics_on = metrics_enabled();

    // Body size limit: 64 KiB. Lifecycle requests are a handful of
    // short fields; anything larger is not a legitimate request.
    let mut api = Router::new()
        .merge(routes::domains::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(64 * 1024));

    if metrics_on {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(metrics.clone()));
    }

    let api = api
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let mut probes = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    if metrics_on {
        probes = probes
            .route("/metrics", axum::routing::get(prometheus_metrics))
            .layer(Extension(metrics));
    }

    let probes = probes.with_state(state);

    Router::new().merge(probes).merge(api)
}

/// GET /metrics — Prometheus metrics scrape endpoint.
///
/// Updates the resident-actor gauge from the directory on each scrape
/// (pull model), then encodes everything in text exposition format.
async fn prometheus_metrics(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
) -> impl IntoResponse {
    metrics
        .domains_resident()
        .set(state.directory.resident() as f64);

    match metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the gateway can serve traffic.
///
/// Checks the database connection when one is configured; in-memory
/// mode has no external dependencies and is always ready.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if let Some(pool) = &state.db_pool {
        if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!("Database health check failed: {e}");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
        }
    }

    (StatusCode::OK, "ready").into_response()
}
