//! # Domain Lifecycle API
//!
//! The transition gateway: initialize a domain's lifecycle record, read
//! its current state and history, and request transitions. Every
//! mutation is routed through the owning [`reg_actor::DomainActor`], so
//! two concurrent requests for the same name are serialized no matter
//! how many gateway tasks carry them.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use reg_actor::TransitionCommand;
use reg_core::{DomainId, DomainName};
use reg_state::{DomainLifecycleState, DomainState, TransitionRecord, TransitionResult};

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

const STATE_NAMES: &str =
    "available, registered, active, expiring, grace_period, redemption, suspended, deleted";

/// Request to initialize (or reset) a domain's lifecycle record.
#[derive(Debug, Deserialize, ToSchema)]
pub struct InitializeRequest {
    /// Registry-assigned identifier for the domain (ROID or similar).
    pub domain_id: String,
}

impl Validate for InitializeRequest {
    fn validate(&self) -> Result<(), String> {
        if self.domain_id.trim().is_empty() {
            return Err("domain_id must be non-empty".to_string());
        }
        if self.domain_id.len() > 128 {
            return Err("domain_id must not exceed 128 characters".to_string());
        }
        Ok(())
    }
}

/// Request to transition a domain's lifecycle state.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransitionApiRequest {
    /// Registry-assigned identifier; adopted verbatim when the request
    /// auto-initializes a fresh record.
    pub domain_id: String,
    /// Target state name in snake_case (e.g. "registered", "grace_period").
    pub to_state: String,
    /// Who or what requested the transition (operator, billing sweep, ...).
    pub triggered_by: String,
    /// Optional free-text justification, recorded in the history.
    pub reason: Option<String>,
}

impl Validate for TransitionApiRequest {
    fn validate(&self) -> Result<(), String> {
        if self.domain_id.trim().is_empty() {
            return Err("domain_id must be non-empty".to_string());
        }
        if self.triggered_by.trim().is_empty() {
            return Err("triggered_by must be non-empty".to_string());
        }
        // Reject unknown state names at the validation layer, before
        // any actor is resolved or hydrated.
        serde_json::from_value::<DomainState>(serde_json::Value::String(self.to_state.clone()))
            .map_err(|_| {
                format!(
                    "invalid to_state '{}'. Valid states: {STATE_NAMES}",
                    self.to_state
                )
            })?;
        Ok(())
    }
}

/// Response for `GET /v1/domains/{name}/state`.
///
/// Reading an uninitialized domain is not an error: the record simply
/// does not exist yet, and `initialized` says so.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StateResponse {
    /// Whether a lifecycle record exists for this domain.
    pub initialized: bool,
    /// The full lifecycle record, present iff `initialized` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub state: Option<DomainLifecycleState>,
}

/// Response for `GET /v1/domains/{name}/history`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    /// Applied transitions, oldest first. Empty when the domain has
    /// never left its initial state (or was never initialized).
    #[schema(value_type = Vec<Object>)]
    pub history: Vec<TransitionRecord>,
}

/// Build the domains router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/domains/:name/initialize", post(initialize_domain))
        .route("/v1/domains/:name/state", get(get_state))
        .route("/v1/domains/:name/history", get(get_history))
        .route("/v1/domains/:name/transition", post(transition_domain))
}

/// POST /v1/domains/:name/initialize — Create or reset a lifecycle record.
///
/// Initializing an already-initialized domain resets it to the initial
/// `available` state with an empty history. The previous record is
/// overwritten durably before the response is sent.
#[utoipa::path(
    post,
    path = "/v1/domains/{name}/initialize",
    params(("name" = String, Path, description = "Fully-qualified domain name")),
    request_body = InitializeRequest,
    responses(
        (status = 200, description = "Lifecycle record created or reset"),
        (status = 422, description = "Invalid domain name or request body", body = crate::error::ErrorBody),
    ),
    tag = "domains"
)]
async fn initialize_domain(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<InitializeRequest>, JsonRejection>,
) -> Result<Json<DomainLifecycleState>, AppError> {
    let req = extract_validated_json(body)?;
    let name = DomainName::new(name)?;
    let domain_id = DomainId::new(req.domain_id)?;

    let actor = state.directory.resolve(&name);
    let record = actor.initialize(domain_id).await?;
    state.publish_snapshot(record.clone());

    if let Some(pool) = &state.db_pool {
        let fields = crate::db::domains::StateFields::default();
        if let Err(e) = crate::db::domains::upsert_mirror(pool, &record, &fields).await {
            tracing::warn!(domain = %name, error = %e, "mirror upsert failed after initialize");
        }
    }

    Ok(Json(record))
}

/// GET /v1/domains/:name/state — Current lifecycle state.
#[utoipa::path(
    get,
    path = "/v1/domains/{name}/state",
    params(("name" = String, Path, description = "Fully-qualified domain name")),
    responses(
        (status = 200, description = "Current state (initialized=false when no record exists)", body = StateResponse),
        (status = 422, description = "Invalid domain name", body = crate::error::ErrorBody),
    ),
    tag = "domains"
)]
async fn get_state(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StateResponse>, AppError> {
    let name = DomainName::new(name)?;

    if let Some(snapshot) = state.snapshots.get(&name) {
        return Ok(Json(StateResponse {
            initialized: true,
            state: Some(snapshot.clone()),
        }));
    }

    // Cache miss falls through to the actor. The record is NOT written
    // back here: a read racing a transition could otherwise insert a
    // pre-transition snapshot after the writer published, and the cache
    // would serve it until the next write. Only write paths publish.
    let actor = state.directory.resolve(&name);
    match actor.state().await? {
        Some(record) => Ok(Json(StateResponse {
            initialized: true,
            state: Some(record),
        })),
        None => Ok(Json(StateResponse {
            initialized: false,
            state: None,
        })),
    }
}

/// GET /v1/domains/:name/history — Applied transitions, oldest first.
#[utoipa::path(
    get,
    path = "/v1/domains/{name}/history",
    params(("name" = String, Path, description = "Fully-qualified domain name")),
    responses(
        (status = 200, description = "Transition history", body = HistoryResponse),
        (status = 422, description = "Invalid domain name", body = crate::error::ErrorBody),
    ),
    tag = "domains"
)]
async fn get_history(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let name = DomainName::new(name)?;
    let actor = state.directory.resolve(&name);
    let history = actor.history().await?;
    Ok(Json(HistoryResponse { history }))
}

/// POST /v1/domains/:name/transition — Request a lifecycle transition.
///
/// Transitions are validated against the fixed lifecycle graph by the
/// owning actor. A request against an uninitialized domain first
/// initializes it to `available` (durably, even if the transition is
/// then rejected) and evaluates from there.
///
/// Policy rejections are an expected outcome, not a server fault: they
/// return 409 with a [`TransitionResult`] whose `error` names the valid
/// target states. Only storage failures produce a 500.
#[utoipa::path(
    post,
    path = "/v1/domains/{name}/transition",
    params(("name" = String, Path, description = "Fully-qualified domain name")),
    request_body = TransitionApiRequest,
    responses(
        (status = 200, description = "Transition applied"),
        (status = 409, description = "Transition rejected by lifecycle policy"),
        (status = 422, description = "Invalid domain name or request body", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure, no state was changed", body = crate::error::ErrorBody),
    ),
    tag = "domains"
)]
async fn transition_domain(
    State(state): State<AppState>,
    metrics: Option<Extension<ApiMetrics>>,
    Path(name): Path<String>,
    body: Result<Json<TransitionApiRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TransitionResult>), AppError> {
    let req = extract_validated_json(body)?;
    let name = DomainName::new(name)?;
    let domain_id = DomainId::new(req.domain_id)?;

    // Validate already proved this parses.
    let to_state: DomainState =
        serde_json::from_value(serde_json::Value::String(req.to_state.clone())).map_err(|_| {
            AppError::Validation(format!(
                "invalid to_state '{}'. Valid states: {STATE_NAMES}",
                req.to_state
            ))
        })?;

    let actor = state.directory.resolve(&name);
    let result = actor
        .transition(TransitionCommand {
            domain_id,
            to_state,
            triggered_by: req.triggered_by,
            reason: req.reason,
        })
        .await?;

    // Republish the cache from the durable record on both outcomes:
    // the actor may have auto-initialized even on rejection. A read
    // failure here is logged, not fatal — the transition itself is
    // already committed.
    let committed = match actor.state().await {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(domain = %name, error = %e, "record read failed after transition");
            None
        }
    };
    if let Some(record) = &committed {
        state.publish_snapshot(record.clone());
    }

    if let Some(Extension(m)) = &metrics {
        m.record_transition(
            result.from_state.as_str(),
            result.to_state.as_str(),
            result.success,
        );
    }

    if !result.success {
        return Ok((StatusCode::CONFLICT, Json(result)));
    }

    // Best-effort relational mirror and audit trail. The actor's own
    // record is already durable at this point.
    if let Some(pool) = &state.db_pool {
        match &committed {
            Some(record) => {
                let fields = record
                    .history
                    .last()
                    .map(crate::db::domains::state_fields)
                    .unwrap_or_default();
                if let Err(e) = crate::db::domains::upsert_mirror(pool, record, &fields).await {
                    tracing::warn!(domain = %name, error = %e, "mirror upsert failed after transition");
                }
                if let Some(last) = record.history.last() {
                    if let Err(e) = crate::db::domains::append_audit(pool, record, last).await {
                        tracing::warn!(domain = %name, error = %e, "audit append failed after transition");
                    }
                }
            }
            None => {
                tracing::warn!(domain = %name, "no record after applied transition");
            }
        }
    }

    Ok((StatusCode::OK, Json(result)))
}
