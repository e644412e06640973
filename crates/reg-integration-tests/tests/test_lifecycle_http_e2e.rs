//! # End-to-End HTTP Lifecycle Scenario
//!
//! Exercises the full gateway as a unified system: a domain is
//! registered, goes through renewal-lapse states down to deletion, and
//! becomes available again. Along the way the policy rejects illegal
//! jumps, reads never mutate, and malformed requests are stopped at the
//! validation layer before any actor is touched.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use reg_api::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build the full application in in-memory mode.
fn test_app() -> axum::Router {
    reg_api::app(AppState::new())
}

/// Parse a response body as JSON.
async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Build a POST request with a JSON body.
fn post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a GET request.
fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Shorthand for a transition request body.
fn transition_body(to_state: &str) -> serde_json::Value {
    serde_json::json!({
        "domain_id": "dom-7731",
        "to_state": to_state,
        "triggered_by": "integration-test",
    })
}

// ---------------------------------------------------------------------------
// The Scenario
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scenario_full_registration_to_deletion_cycle() {
    let app = test_app();

    // Act 1: initialize the record. A fresh domain starts available.
    let resp = app
        .clone()
        .oneshot(post(
            "/v1/domains/shop.example.com/initialize",
            serde_json::json!({"domain_id": "dom-7731"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let record = body_json(resp).await;
    assert_eq!(record["current_state"], "available");
    assert_eq!(record["domain_id"], "dom-7731");
    assert_eq!(record["history"], serde_json::json!([]));

    // Act 2: walk the happy path down to deletion and back around.
    let path = [
        "registered",
        "active",
        "expiring",
        "grace_period",
        "redemption",
        "deleted",
        "available",
    ];
    for to_state in path {
        let resp = app
            .clone()
            .oneshot(post(
                "/v1/domains/shop.example.com/transition",
                transition_body(to_state),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "transition to {to_state}");
        let result = body_json(resp).await;
        assert_eq!(result["success"], true);
        assert_eq!(result["to_state"], to_state);
    }

    // Act 3: the history records every hop, oldest first.
    let resp = app
        .clone()
        .oneshot(get("/v1/domains/shop.example.com/history"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let history = body_json(resp).await;
    let entries = history["history"].as_array().unwrap();
    assert_eq!(entries.len(), path.len());
    assert_eq!(entries[0]["from_state"], "available");
    assert_eq!(entries[0]["to_state"], "registered");
    assert_eq!(entries.last().unwrap()["to_state"], "available");
    for entry in entries {
        assert_eq!(entry["triggered_by"], "integration-test");
    }

    // Act 4: the state endpoint agrees.
    let resp = app
        .clone()
        .oneshot(get("/v1/domains/shop.example.com/state"))
        .await
        .unwrap();
    let state = body_json(resp).await;
    assert_eq!(state["initialized"], true);
    assert_eq!(state["state"]["current_state"], "available");
}

#[tokio::test]
async fn illegal_jump_is_rejected_with_conflict() {
    let app = test_app();

    app.clone()
        .oneshot(post(
            "/v1/domains/parked.example.com/initialize",
            serde_json::json!({"domain_id": "dom-1"}),
        ))
        .await
        .unwrap();

    // available -> active skips registration and must be rejected.
    let resp = app
        .clone()
        .oneshot(post(
            "/v1/domains/parked.example.com/transition",
            transition_body("active"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let result = body_json(resp).await;
    assert_eq!(result["success"], false);
    assert_eq!(result["from_state"], "available");
    assert_eq!(result["to_state"], "active");
    let error = result["error"].as_str().unwrap();
    assert!(error.contains("Invalid transition from available to active"));
    assert!(error.contains("registered"), "diagnostic lists valid targets");

    // The rejection left the record untouched.
    let resp = app
        .clone()
        .oneshot(get("/v1/domains/parked.example.com/state"))
        .await
        .unwrap();
    let state = body_json(resp).await;
    assert_eq!(state["state"]["current_state"], "available");

    let resp = app
        .clone()
        .oneshot(get("/v1/domains/parked.example.com/history"))
        .await
        .unwrap();
    let history = body_json(resp).await;
    assert_eq!(history["history"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn transition_auto_initializes_unknown_domain() {
    let app = test_app();

    // No initialize call. The transition seeds the record at available
    // and evaluates from there.
    let resp = app
        .clone()
        .oneshot(post(
            "/v1/domains/fresh.example.com/transition",
            transition_body("registered"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let result = body_json(resp).await;
    assert_eq!(result["from_state"], "available");
    assert_eq!(result["to_state"], "registered");
}

#[tokio::test]
async fn rejected_auto_initialization_still_creates_the_record() {
    let app = test_app();

    // deleted is unreachable from available, so the transition is
    // rejected — but the auto-initialized record persists.
    let resp = app
        .clone()
        .oneshot(post(
            "/v1/domains/ghost.example.com/transition",
            transition_body("deleted"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = app
        .clone()
        .oneshot(get("/v1/domains/ghost.example.com/state"))
        .await
        .unwrap();
    let state = body_json(resp).await;
    assert_eq!(state["initialized"], true);
    assert_eq!(state["state"]["current_state"], "available");
}

#[tokio::test]
async fn reading_an_uninitialized_domain_is_not_an_error() {
    let app = test_app();

    let resp = app
        .clone()
        .oneshot(get("/v1/domains/nobody.example.com/state"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let state = body_json(resp).await;
    assert_eq!(state, serde_json::json!({"initialized": false}));

    // A read never initializes: still uninitialized afterwards.
    let resp = app
        .clone()
        .oneshot(get("/v1/domains/nobody.example.com/history"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let history = body_json(resp).await;
    assert_eq!(history["history"].as_array().unwrap().len(), 0);

    let resp = app
        .clone()
        .oneshot(get("/v1/domains/nobody.example.com/state"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["initialized"], false);
}

#[tokio::test]
async fn reinitialize_resets_state_and_history() {
    let app = test_app();

    app.clone()
        .oneshot(post(
            "/v1/domains/reset.example.com/initialize",
            serde_json::json!({"domain_id": "dom-before"}),
        ))
        .await
        .unwrap();
    for to_state in ["registered", "active"] {
        let resp = app
            .clone()
            .oneshot(post(
                "/v1/domains/reset.example.com/transition",
                transition_body(to_state),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    // Re-initialize with a new registry ID: back to square one.
    let resp = app
        .clone()
        .oneshot(post(
            "/v1/domains/reset.example.com/initialize",
            serde_json::json!({"domain_id": "dom-after"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let record = body_json(resp).await;
    assert_eq!(record["current_state"], "available");
    assert_eq!(record["domain_id"], "dom-after");

    let resp = app
        .clone()
        .oneshot(get("/v1/domains/reset.example.com/history"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["history"].as_array().unwrap().len(), 0);
}

// ---------------------------------------------------------------------------
// Validation layer
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_json_body_is_unprocessable() {
    let app = test_app();

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/domains/x.example.com/transition")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn unknown_target_state_is_unprocessable() {
    let app = test_app();

    let resp = app
        .clone()
        .oneshot(post(
            "/v1/domains/x.example.com/transition",
            transition_body("parked"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains("parked"));

    // Nothing was initialized by the rejected request.
    let resp = app
        .oneshot(get("/v1/domains/x.example.com/state"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["initialized"], false);
}

#[tokio::test]
async fn invalid_domain_name_is_unprocessable() {
    let app = test_app();

    let resp = app
        .clone()
        .oneshot(get("/v1/domains/-bad-label-.example.com/state"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = app
        .oneshot(post(
            "/v1/domains/bad..dots.example.com/initialize",
            serde_json::json!({"domain_id": "dom-1"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn missing_triggered_by_is_unprocessable() {
    let app = test_app();

    let resp = app
        .oneshot(post(
            "/v1/domains/x.example.com/transition",
            serde_json::json!({
                "domain_id": "dom-1",
                "to_state": "registered",
                "triggered_by": "",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn domain_names_are_case_insensitive() {
    let app = test_app();

    app.clone()
        .oneshot(post(
            "/v1/domains/MiXeD.Example.COM/initialize",
            serde_json::json!({"domain_id": "dom-1"}),
        ))
        .await
        .unwrap();

    // The lowercase spelling addresses the same record.
    let resp = app
        .oneshot(get("/v1/domains/mixed.example.com/state"))
        .await
        .unwrap();
    let state = body_json(resp).await;
    assert_eq!(state["initialized"], true);
}

// ---------------------------------------------------------------------------
// Operational surface
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_probes_respond() {
    let app = test_app();

    let resp = app
        .clone()
        .oneshot(get("/health/liveness"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // In-memory mode has no external dependencies: always ready.
    let resp = app.oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn metrics_scrape_exposes_transition_counters() {
    let app = test_app();

    app.clone()
        .oneshot(post(
            "/v1/domains/metrics.example.com/transition",
            transition_body("registered"),
        ))
        .await
        .unwrap();

    let resp = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("reg_http_requests_total"));
    assert!(text.contains("reg_domain_transitions_total"));
    assert!(text.contains("reg_domains_resident"));
    // The path label is normalized; no raw domain names leak in.
    assert!(!text.contains("metrics.example.com"));
}

#[tokio::test]
async fn openapi_spec_is_served() {
    let app = test_app();

    let resp = app.oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let spec = body_json(resp).await;
    assert!(spec["paths"]
        .as_object()
        .unwrap()
        .contains_key("/v1/domains/{name}/transition"));
}
