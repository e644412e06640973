//! Validated JSON extraction.
//!
//! Handlers take `Result<Json<T>, JsonRejection>` and route it through
//! [`extract_validated_json`] so that malformed bodies and
//! business-rule violations both land as structured 422 responses —
//! before any actor state is touched.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Request-level validation, applied after deserialization.
pub trait Validate {
    /// Check semantic validity; the message becomes the 422 body.
    fn validate(&self) -> Result<(), String>;
}

/// Unwrap a JSON extraction and run request validation.
pub fn extract_validated_json<T: Validate>(
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let Json(value) = body.map_err(|e| AppError::BadRequest(format!("invalid request body: {e}")))?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}
