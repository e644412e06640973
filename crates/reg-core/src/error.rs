//! Structured validation errors for domain-primitive construction.

use thiserror::Error;

/// Errors raised when constructing a domain primitive from raw input.
///
/// Each variant carries the offending input (or a description of it)
/// so callers can report precisely what was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The domain name failed syntactic validation.
    #[error("invalid domain name '{input}': {reason}")]
    InvalidDomainName {
        /// The rejected input, as received.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The domain identifier failed validation.
    #[error("invalid domain id: {0}")]
    InvalidDomainId(String),
}
