//! # Identity Newtypes
//!
//! Domain-primitive newtypes for the two identifiers that address a
//! lifecycle record. Each is a distinct type — you cannot pass a
//! [`DomainId`] where a [`DomainName`] is expected.
//!
//! ## Validation
//!
//! [`DomainName`] is the addressing key for actor resolution, so it is
//! normalized (lowercased) and syntax-checked at construction.
//! [`DomainId`] is an opaque caller-assigned identifier; it is only
//! checked for presence and length.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Helper macro to implement `Deserialize` for string newtypes that must
/// validate their contents. Deserializes as a plain `String`, then routes
/// through the type's `new()` constructor so that invalid values are
/// rejected at deserialization time — not silently accepted.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// An opaque identifier for a domain, assigned once at creation by the
/// calling layer (typically the relational store's row id). Immutable
/// for the lifetime of the domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DomainId(String);

impl DomainId {
    /// Maximum accepted length. Generous — the id is opaque, but an
    /// unbounded id is a storage and logging hazard.
    const MAX_LEN: usize = 128;

    /// Create a domain id from raw input.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ValidationError::InvalidDomainId(
                "must not be empty".to_string(),
            ));
        }
        if raw.len() > Self::MAX_LEN {
            return Err(ValidationError::InvalidDomainId(format!(
                "must not exceed {} characters (got {})",
                Self::MAX_LEN,
                raw.len()
            )));
        }
        Ok(Self(raw))
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DomainId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl_validating_deserialize!(DomainId);

/// A fully-qualified domain name — the addressing key that routes every
/// operation to the single actor instance owning that domain.
///
/// Normalized to lowercase at construction so `Example.COM` and
/// `example.com` resolve to the same actor. Validation is syntactic
/// (length and label shape), not a registry lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DomainName(String);

impl DomainName {
    /// RFC 1035 overall length limit.
    const MAX_LEN: usize = 253;
    /// RFC 1035 per-label length limit.
    const MAX_LABEL_LEN: usize = 63;

    /// Create a domain name from raw input, normalizing to lowercase.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let normalized = raw.trim().to_ascii_lowercase();

        let reject = |reason: &str| {
            Err(ValidationError::InvalidDomainName {
                input: raw.clone(),
                reason: reason.to_string(),
            })
        };

        if normalized.is_empty() {
            return reject("must not be empty");
        }
        if normalized.len() > Self::MAX_LEN {
            return reject("must not exceed 253 characters");
        }
        for label in normalized.split('.') {
            if label.is_empty() {
                return reject("labels must not be empty");
            }
            if label.len() > Self::MAX_LABEL_LEN {
                return reject("labels must not exceed 63 characters");
            }
            if label.starts_with('-') || label.ends_with('-') {
                return reject("labels must not start or end with a hyphen");
            }
            if !label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return reject("labels must be ASCII alphanumeric, hyphen, or underscore");
            }
        }

        Ok(Self(normalized))
    }

    /// Access the normalized name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DomainName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DomainName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl_validating_deserialize!(DomainName);
