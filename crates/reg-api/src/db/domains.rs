//! Relational mirror and audit writers.
//!
//! Called by the gateway around successful lifecycle operations. These
//! writes are best-effort: a failure here is logged and does not fail
//! the operation, because the actor's own record — not this mirror —
//! is where durability lives.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

use reg_state::{DomainLifecycleState, DomainState, TransitionRecord};

/// Registration period granted by a renewal.
const RENEWAL_PERIOD_DAYS: i64 = 365;
/// Length of the grace and redemption windows.
const HOLD_PERIOD_DAYS: i64 = 30;

/// State-specific mirror columns derived from one applied transition.
///
/// A `None` field means "leave the stored value alone": the upsert
/// coalesces each column, so entering redemption does not wipe the
/// suspension reason recorded two transitions ago.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StateFields {
    pub expires_at: Option<DateTime<Utc>>,
    pub suspension_reason: Option<String>,
    pub grace_period_ends_at: Option<DateTime<Utc>>,
    pub redemption_ends_at: Option<DateTime<Utc>>,
}

/// Derive the state-specific columns for one applied transition.
///
/// Expiring→active is a renewal and extends the expiry a full period
/// from the transition time. Entering suspension records the caller's
/// reason, or "Abuse detected" when none was given. Entering the grace
/// or redemption window stamps when that window closes.
pub fn state_fields(transition: &TransitionRecord) -> StateFields {
    let mut fields = StateFields::default();
    match (transition.from_state, transition.to_state) {
        (DomainState::Expiring, DomainState::Active) => {
            fields.expires_at = Some(transition.timestamp + Duration::days(RENEWAL_PERIOD_DAYS));
        }
        (_, DomainState::Suspended) => {
            fields.suspension_reason = Some(
                transition
                    .reason
                    .clone()
                    .unwrap_or_else(|| "Abuse detected".to_string()),
            );
        }
        (_, DomainState::GracePeriod) => {
            fields.grace_period_ends_at =
                Some(transition.timestamp + Duration::days(HOLD_PERIOD_DAYS));
        }
        (_, DomainState::Redemption) => {
            fields.redemption_ends_at =
                Some(transition.timestamp + Duration::days(HOLD_PERIOD_DAYS));
        }
        _ => {}
    }
    fields
}

/// Upsert the mirror row for a domain from its current snapshot.
///
/// `fields` carries the state-specific columns for the transition that
/// produced this snapshot; pass a default for initialize, which has no
/// transition.
pub async fn upsert_mirror(
    pool: &PgPool,
    record: &DomainLifecycleState,
    fields: &StateFields,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO domains
             (domain_id, domain_name, state, expires_at, suspension_reason,
              grace_period_ends_at, redemption_ends_at, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         ON CONFLICT (domain_id)
         DO UPDATE SET state = EXCLUDED.state,
                       domain_name = EXCLUDED.domain_name,
                       expires_at = COALESCE(EXCLUDED.expires_at, domains.expires_at),
                       suspension_reason = COALESCE(EXCLUDED.suspension_reason, domains.suspension_reason),
                       grace_period_ends_at = COALESCE(EXCLUDED.grace_period_ends_at, domains.grace_period_ends_at),
                       redemption_ends_at = COALESCE(EXCLUDED.redemption_ends_at, domains.redemption_ends_at),
                       updated_at = EXCLUDED.updated_at",
    )
    .bind(record.domain_id.as_str())
    .bind(record.domain_name.as_str())
    .bind(record.current_state.as_str())
    .bind(fields.expires_at)
    .bind(&fields.suspension_reason)
    .bind(fields.grace_period_ends_at)
    .bind(fields.redemption_ends_at)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Append an audit row for one applied transition.
pub async fn append_audit(
    pool: &PgPool,
    record: &DomainLifecycleState,
    transition: &TransitionRecord,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO domain_transitions
             (domain_id, domain_name, from_state, to_state, triggered_by, reason, occurred_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(record.domain_id.as_str())
    .bind(record.domain_name.as_str())
    .bind(transition.from_state.as_str())
    .bind(transition.to_state.as_str())
    .bind(&transition.triggered_by)
    .bind(&transition.reason)
    .bind(transition.timestamp)
    .execute(pool)
    .await?;

    Ok(())
}
