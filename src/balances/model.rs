//! Balance summary models

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::cases::{parse_money_cents, CaseStatus};
use crate::error::LedgerError;

/// Storage-layer cap on recovery notes, mirrored here so the request is
/// rejected before a write is attempted
const RECOVERY_NOTES_MAX_LEN: usize = 4000;

/// Per-user balance summary (one row per user, upsert semantics)
///
/// `amount_recovered_cents` is administrator-entered and never derived from
/// case amounts or statuses.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct BalanceSummary {
    pub user_id: Uuid,
    pub amount_lost_cents: i64,
    pub amount_recovered_cents: i64,
    pub total_cases: i32,
    pub pending_cases: i32,
    pub completed_cases: i32,
    pub recovery_notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl BalanceSummary {
    /// Zeroed summary for a user with no cases yet
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            amount_lost_cents: 0,
            amount_recovered_cents: 0,
            total_cases: 0,
            pending_cases: 0,
            completed_cases: 0,
            recovery_notes: None,
            updated_at: Utc::now(),
        }
    }
}

/// Case counts derived from a user's current case set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseCounts {
    pub total: i32,
    pub pending: i32,
    pub completed: i32,
}

/// Derive counts from scratch.
///
/// The administrator surface allows arbitrary status jumps, so counters are
/// always recomputed from the current case set rather than adjusted
/// incrementally.
pub fn derive_counts(statuses: &[CaseStatus]) -> CaseCounts {
    CaseCounts {
        total: statuses.len() as i32,
        pending: statuses.iter().filter(|s| s.is_pending()).count() as i32,
        completed: statuses.iter().filter(|s| s.is_complete()).count() as i32,
    }
}

/// Request DTO for setting a user's recovered amount and notes
#[derive(Debug, Deserialize)]
pub struct SetRecoveryRequest {
    /// Recovered dollar amount as entered, e.g. "750.00"; zero is allowed
    pub amount_recovered: String,
    pub notes: Option<String>,
}

impl SetRecoveryRequest {
    pub fn validate(&self) -> Result<(i64, Option<String>), LedgerError> {
        let cents = parse_money_cents(&self.amount_recovered)
            .map_err(|msg| LedgerError::validation("amount_recovered", msg))?;

        let notes = self
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        if let Some(notes) = &notes {
            if notes.chars().count() > RECOVERY_NOTES_MAX_LEN {
                return Err(LedgerError::validation(
                    "notes",
                    format!("must be at most {} characters", RECOVERY_NOTES_MAX_LEN),
                ));
            }
        }

        Ok((cents, notes))
    }
}
