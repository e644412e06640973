//! # reg-actor — Per-Domain Lifecycle Actors
//!
//! Each domain name has exactly one logical owner: a [`DomainActor`]
//! that holds the domain's lifecycle record, serializes every
//! operation against it, enforces the transition policy, and persists
//! through a [`StateStore`](reg_store::StateStore). The
//! [`ActorDirectory`] maps names to instances, creating them lazily on
//! first reference.
//!
//! ## Why single-owner
//!
//! The one shared mutable resource in the system is a domain's
//! persisted record. Routing all mutation through one instance with
//! one lock removes lost-update races outright: two callers can never
//! evaluate transitions against the same stale `from_state`, because
//! the second caller does not run until the first has committed.
//! Different domains share nothing and run fully in parallel.

pub mod actor;
pub mod directory;

pub use actor::{ActorError, DomainActor, TransitionCommand};
pub use directory::ActorDirectory;
