//! # Middleware Stack
//!
//! Tower middleware for the gateway:
//! - [`metrics`]: Prometheus-compatible request metrics.
//!
//! Request tracing uses `tower_http::trace::TraceLayer`, applied
//! during router assembly in `lib.rs`.

pub mod metrics;
