//! The per-domain lifecycle record: current state plus append-only
//! transition history, and the result type every transition returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reg_core::{DomainId, DomainName};

use crate::state::{DomainState, LifecycleError};

/// One entry in a domain's transition history. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state the domain left.
    pub from_state: DomainState,
    /// The state the domain entered.
    pub to_state: DomainState,
    /// Free-text identifier of the actor that requested the transition
    /// (an API handler, an expiry sweep, an abuse action, ...).
    pub triggered_by: String,
    /// Optional free-text reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// When the transition was applied.
    pub timestamp: DateTime<Utc>,
}

/// The full lifecycle state of one domain — the single source of truth
/// for "what state is this domain in".
///
/// Owned exclusively by that domain's actor instance; nothing else
/// mutates it. `history` is append-only, oldest first, and is never
/// truncated here (archival is an external concern).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainLifecycleState {
    /// Opaque identifier, assigned once at creation.
    pub domain_id: DomainId,
    /// The addressing key.
    pub domain_name: DomainName,
    /// Current lifecycle state.
    pub current_state: DomainState,
    /// Ordered transition history, oldest first.
    pub history: Vec<TransitionRecord>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every transition.
    pub updated_at: DateTime<Utc>,
}

impl DomainLifecycleState {
    /// Create a fresh record in the initial state with empty history.
    pub fn new(domain_id: DomainId, domain_name: DomainName) -> Self {
        let now = Utc::now();
        Self {
            domain_id,
            domain_name,
            current_state: DomainState::initial(),
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a transition to `to_state`, appending a history record.
    ///
    /// This is the only way history grows: the edge is checked against
    /// the transition policy first, and on rejection the record is
    /// untouched — no partial mutation. Returns the appended record.
    pub fn apply(
        &mut self,
        to_state: DomainState,
        triggered_by: impl Into<String>,
        reason: Option<String>,
    ) -> Result<&TransitionRecord, LifecycleError> {
        let from_state = self.current_state;
        if !from_state.can_transition_to(to_state) {
            return Err(LifecycleError::InvalidTransition {
                from: from_state,
                to: to_state,
            });
        }

        let now = Utc::now();
        self.current_state = to_state;
        self.updated_at = now;
        self.history.push(TransitionRecord {
            from_state,
            to_state,
            triggered_by: triggered_by.into(),
            reason,
            timestamp: now,
        });

        Ok(self.history.last().expect("history was just appended"))
    }

    /// Whether `current_state` agrees with the history tail: equal to
    /// the last record's `to_state`, or the initial state when history
    /// is empty. Every persisted record must satisfy this.
    pub fn is_consistent(&self) -> bool {
        match self.history.last() {
            Some(last) => self.current_state == last.to_state,
            None => self.current_state == DomainState::initial(),
        }
    }
}

/// The outcome of one `transition` request.
///
/// Policy rejections are an expected, user-facing outcome — they come
/// back through this type with `success: false` and a message listing
/// the legal targets, not through an error channel. Only infrastructure
/// failures (storage) surface as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionResult {
    /// Whether the transition was applied.
    pub success: bool,
    /// The state the domain was in when the request was evaluated.
    pub from_state: DomainState,
    /// The requested target state.
    pub to_state: DomainState,
    /// When the request was evaluated.
    pub timestamp: DateTime<Utc>,
    /// Rejection diagnostic; present exactly when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransitionResult {
    /// A successful, applied transition.
    pub fn applied(from_state: DomainState, to_state: DomainState, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: true,
            from_state,
            to_state,
            timestamp,
            error: None,
        }
    }

    /// A policy rejection. State and history were left untouched.
    pub fn rejected(from_state: DomainState, to_state: DomainState, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: false,
            from_state,
            to_state,
            timestamp,
            error: Some(
                LifecycleError::InvalidTransition {
                    from: from_state,
                    to: to_state,
                }
                .to_string(),
            ),
        }
    }
}
