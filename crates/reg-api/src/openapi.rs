//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI 3.1
//! spec, served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the gateway surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Domain Lifecycle Registry API",
        version = "0.3.2",
        description = "Transition gateway for the domain-name lifecycle control plane.\n\nEach domain name owns a durable lifecycle record (state plus transition history) managed by a single in-process actor. Transitions are validated against a fixed lifecycle graph: available, registered, active, expiring, grace_period, redemption, suspended, deleted. Policy rejections return 409 with a diagnostic listing the valid target states.\n\nHealth probes (`/health/*`) and the Prometheus scrape (`/metrics`) carry no request body."
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        crate::routes::domains::initialize_domain,
        crate::routes::domains::get_state,
        crate::routes::domains::get_history,
        crate::routes::domains::transition_domain,
    ),
    components(
        schemas(
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
            crate::routes::domains::InitializeRequest,
            crate::routes::domains::TransitionApiRequest,
            crate::routes::domains::StateResponse,
            crate::routes::domains::HistoryResponse,
        ),
    ),
    tags(
        (name = "domains", description = "Domain lifecycle — initialize, state, history, transition"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
