//! # reg-core — Foundational Types
//!
//! Domain-primitive newtypes shared by every crate in the registrar
//! control plane. Identifiers validate at construction time and at
//! deserialization time — an invalid domain name or id never makes it
//! past the wire.

pub mod error;
pub mod identity;

pub use error::ValidationError;
pub use identity::{DomainId, DomainName};
