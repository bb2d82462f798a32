//! Balance summary service layer

use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::balances::{derive_counts, BalanceSummary};
use crate::cases::CaseStatus;
use crate::error::LedgerError;

/// Service for reading balance summaries and recording recovered amounts
#[derive(Clone)]
pub struct BalanceService {
    db_pool: PgPool,
}

impl BalanceService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Get a user's balance summary.
    ///
    /// Summaries are created lazily on the first case, so a user without one
    /// simply has a zeroed summary.
    pub async fn get_for_user(&self, user_id: Uuid) -> Result<BalanceSummary, LedgerError> {
        let summary = sqlx::query_as::<_, BalanceSummary>(
            "SELECT * FROM balance_summaries WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(summary.unwrap_or_else(|| BalanceSummary::empty(user_id)))
    }

    /// Record an administrator-entered recovered amount and notes.
    ///
    /// The recovered amount is an independent value; case counters and the
    /// lost amount are left untouched.
    pub async fn set_recovery(
        &self,
        user_id: Uuid,
        amount_recovered_cents: i64,
        notes: Option<String>,
    ) -> Result<BalanceSummary, LedgerError> {
        let user_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)",
        )
        .bind(user_id)
        .fetch_one(&self.db_pool)
        .await?;

        if !user_exists {
            return Err(LedgerError::NotFound("user"));
        }

        let summary = sqlx::query_as::<_, BalanceSummary>(
            r#"
            INSERT INTO balance_summaries (
                user_id, amount_lost_cents, amount_recovered_cents,
                total_cases, pending_cases, completed_cases,
                recovery_notes, updated_at
            )
            VALUES ($1, 0, $2, 0, 0, 0, $3, $4)
            ON CONFLICT (user_id) DO UPDATE SET
                amount_recovered_cents = EXCLUDED.amount_recovered_cents,
                recovery_notes = EXCLUDED.recovery_notes,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(amount_recovered_cents)
        .bind(&notes)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?;

        Ok(summary)
    }
}

/// Recompute a user's summary counters and lost amount from the current case
/// set and upsert the row, preserving the administrator-entered recovered
/// amount and notes.
///
/// Runs on the caller's connection so case mutations and the summary write
/// share one transaction.
pub(crate) async fn recompute_summary(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> Result<(), sqlx::Error> {
    let rows = sqlx::query_as::<_, (CaseStatus, i64)>(
        "SELECT status, amount_cents FROM cases WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    let statuses: Vec<CaseStatus> = rows.iter().map(|(status, _)| *status).collect();
    let counts = derive_counts(&statuses);
    let amount_lost_cents: i64 = rows.iter().map(|(_, amount)| amount).sum();

    sqlx::query(
        r#"
        INSERT INTO balance_summaries (
            user_id, amount_lost_cents, amount_recovered_cents,
            total_cases, pending_cases, completed_cases, updated_at
        )
        VALUES ($1, $2, 0, $3, $4, $5, $6)
        ON CONFLICT (user_id) DO UPDATE SET
            amount_lost_cents = EXCLUDED.amount_lost_cents,
            total_cases = EXCLUDED.total_cases,
            pending_cases = EXCLUDED.pending_cases,
            completed_cases = EXCLUDED.completed_cases,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(user_id)
    .bind(amount_lost_cents)
    .bind(counts.total)
    .bind(counts.pending)
    .bind(counts.completed)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    Ok(())
}
