//! # reg-state — Domain Lifecycle State Machine
//!
//! The pure core of the registrar control plane: the fixed 8-state
//! transition graph, the per-domain lifecycle record with its
//! append-only history, and the transition result wire types.
//!
//! No I/O lives here. The transition policy is a static table on
//! [`DomainState`]; the only way to append history is
//! [`DomainLifecycleState::apply`], which checks the policy first —
//! an illegal edge is structurally unappendable.
//!
//! ## The Transition Graph
//!
//! ```text
//! Available   -> Registered
//! Registered  -> Active, Suspended
//! Active      -> Expiring, Suspended
//! Expiring    -> Active, GracePeriod, Suspended
//! GracePeriod -> Active, Redemption, Suspended
//! Redemption  -> Active, Deleted, Suspended
//! Suspended   -> Active, Deleted
//! Deleted     -> Available
//! ```
//!
//! There is no terminal state: `Deleted -> Available` lets a released
//! name restart its lifecycle.

pub mod record;
pub mod state;

pub use record::{DomainLifecycleState, TransitionRecord, TransitionResult};
pub use state::{DomainState, LifecycleError};
