//! The domain lifecycle states and the fixed transition policy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The eight lifecycle states a registrar domain can be in.
///
/// Serialized as lowercase snake_case strings (`"grace_period"`) —
/// the wire and storage format for every state value in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainState {
    /// Unregistered and open for registration.
    Available,
    /// Registration accepted, not yet serving.
    Registered,
    /// Fully operational.
    Active,
    /// Approaching expiry; renewal returns it to Active.
    Expiring,
    /// Expired but renewable at no penalty.
    GracePeriod,
    /// Expired; recoverable only via redemption.
    Redemption,
    /// Administratively suspended (abuse, billing, legal hold).
    Suspended,
    /// Released; the name may re-enter the pool.
    Deleted,
}

impl DomainState {
    /// The state every domain starts in.
    pub const fn initial() -> Self {
        Self::Available
    }

    /// The canonical string name of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Registered => "registered",
            Self::Active => "active",
            Self::Expiring => "expiring",
            Self::GracePeriod => "grace_period",
            Self::Redemption => "redemption",
            Self::Suspended => "suspended",
            Self::Deleted => "deleted",
        }
    }

    /// The complete set of states legally reachable from this one.
    ///
    /// This table IS the transition policy — there are no implicit
    /// self-loops and no wildcard edges. No match arm uses a catch-all,
    /// so adding a variant forces a compile error here rather than
    /// silently creating an unreachable state.
    pub fn valid_transitions(&self) -> &'static [DomainState] {
        use DomainState::*;
        match self {
            Available => &[Registered],
            Registered => &[Active, Suspended],
            Active => &[Expiring, Suspended],
            Expiring => &[Active, GracePeriod, Suspended],
            GracePeriod => &[Active, Redemption, Suspended],
            Redemption => &[Active, Deleted, Suspended],
            Suspended => &[Active, Deleted],
            Deleted => &[Available],
        }
    }

    /// Whether `(self, to)` is an edge of the transition graph.
    pub fn can_transition_to(&self, to: DomainState) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Comma-joined list of the legal target states, for diagnostics.
    pub fn valid_transitions_display(&self) -> String {
        self.valid_transitions()
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for DomainState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors from lifecycle record operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// The requested edge is not in the transition graph.
    ///
    /// The message deliberately lists the legal targets so a caller
    /// can self-correct without consulting the graph.
    #[error("Invalid transition from {from} to {to}. Valid transitions: {}", from.valid_transitions_display())]
    InvalidTransition {
        /// The state the domain was in.
        from: DomainState,
        /// The rejected target state.
        to: DomainState,
    },
}
