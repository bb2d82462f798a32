//! Case service layer - lifecycle and ledger consistency rules
//!
//! A case insert and the owner's balance summary update form one transaction;
//! a case is never observable without its summary adjustment. Administrator
//! edits recompute summary counters from the current case set instead of
//! trusting incremental deltas, because arbitrary status jumps are allowed.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::balances::recompute_summary;
use crate::cases::{
    generate_case_number, Case, CaseChanges, CaseStatus, CreateCaseRequest, Evidence,
    ListCasesQuery, NewCase,
};
use crate::error::LedgerError;
use crate::submissions::Submission;

/// Case ledger service
#[derive(Clone)]
pub struct CaseService {
    db_pool: PgPool,
    number_prefix: String,
    number_max_attempts: u32,
}

impl CaseService {
    pub fn new(db_pool: PgPool, number_prefix: String, number_max_attempts: u32) -> Self {
        Self {
            db_pool,
            number_prefix,
            number_max_attempts: number_max_attempts.max(1),
        }
    }

    /// Validate and persist a new case with status `pending`.
    ///
    /// The case insert and the balance summary upsert commit together. On a
    /// case number collision the whole transaction is retried with a fresh
    /// number, up to the configured bound.
    pub async fn create_case(
        &self,
        user_id: Uuid,
        request: CreateCaseRequest,
    ) -> Result<Case, LedgerError> {
        let new_case = request.validate()?;

        for _ in 0..self.number_max_attempts {
            let case_number = generate_case_number(&self.number_prefix);
            match self.try_create(user_id, &case_number, &new_case).await {
                Ok(case) => return Ok(case),
                Err(LedgerError::Database(e)) if is_case_number_conflict(&e) => {
                    tracing::warn!(case_number = %case_number, "Case number collision, retrying");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(LedgerError::CaseNumberAssignment(self.number_max_attempts))
    }

    /// One creation attempt: insert the case and apply the summary deltas in
    /// a single transaction
    async fn try_create(
        &self,
        user_id: Uuid,
        case_number: &str,
        new_case: &NewCase,
    ) -> Result<Case, LedgerError> {
        let mut tx = self.db_pool.begin().await?;
        let now = Utc::now();

        let case = sqlx::query_as::<_, Case>(
            r#"
            INSERT INTO cases (
                id, case_number, user_id, title, description, scam_category,
                amount_cents, status, evidence, submission_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NULL, $10, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(case_number)
        .bind(user_id)
        .bind(&new_case.title)
        .bind(&new_case.description)
        .bind(&new_case.scam_category)
        .bind(new_case.amount_cents)
        .bind(CaseStatus::Pending)
        .bind(new_case.evidence.clone().map(Json))
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO balance_summaries (
                user_id, amount_lost_cents, amount_recovered_cents,
                total_cases, pending_cases, completed_cases, updated_at
            )
            VALUES ($1, $2, 0, 1, 1, 0, $3)
            ON CONFLICT (user_id) DO UPDATE SET
                amount_lost_cents = balance_summaries.amount_lost_cents + EXCLUDED.amount_lost_cents,
                total_cases = balance_summaries.total_cases + 1,
                pending_cases = balance_summaries.pending_cases + 1,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user_id)
        .bind(new_case.amount_cents)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| LedgerError::ConsistencyWrite(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| LedgerError::ConsistencyWrite(e.to_string()))?;

        Ok(case)
    }

    /// Create a case from a promoted submission.
    ///
    /// Field validation happened at submission intake, so only the ledger
    /// rules apply here. The summary is recomputed from scratch because the
    /// initial status may be any lifecycle state.
    pub async fn create_from_submission(
        &self,
        user_id: Uuid,
        submission: &Submission,
        status: CaseStatus,
    ) -> Result<Case, LedgerError> {
        let title = format!("{} Recovery Case", submission.scam_category);
        let evidence = submission
            .evidence_text
            .as_deref()
            .map(Evidence::from_raw)
            .filter(|e| !e.is_empty());

        for _ in 0..self.number_max_attempts {
            let case_number = generate_case_number(&self.number_prefix);

            let mut tx = self.db_pool.begin().await?;
            let now = Utc::now();

            let inserted = sqlx::query_as::<_, Case>(
                r#"
                INSERT INTO cases (
                    id, case_number, user_id, title, description, scam_category,
                    amount_cents, status, evidence, submission_id, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&case_number)
            .bind(user_id)
            .bind(&title)
            .bind(&submission.description)
            .bind(&submission.scam_category)
            .bind(submission.amount_cents)
            .bind(status)
            .bind(evidence.clone().map(Json))
            .bind(submission.id)
            .bind(now)
            .fetch_one(&mut *tx)
            .await;

            let case = match inserted {
                Ok(case) => case,
                Err(e) if is_case_number_conflict(&e) => {
                    tracing::warn!(case_number = %case_number, "Case number collision, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            recompute_summary(&mut *tx, user_id)
                .await
                .map_err(|e| LedgerError::ConsistencyWrite(e.to_string()))?;

            tx.commit()
                .await
                .map_err(|e| LedgerError::ConsistencyWrite(e.to_string()))?;

            return Ok(case);
        }

        Err(LedgerError::CaseNumberAssignment(self.number_max_attempts))
    }

    /// Apply administrator changes to a case and recompute the owner's
    /// summary in the same transaction.
    ///
    /// Re-applying the current status is a no-op apart from `updated_at`
    /// advancing. Last writer wins; no optimistic locking.
    pub async fn update_case(&self, id: Uuid, changes: CaseChanges) -> Result<Case, LedgerError> {
        let mut tx = self.db_pool.begin().await?;

        let current = sqlx::query_as::<_, Case>("SELECT * FROM cases WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(LedgerError::NotFound("case"))?;

        let status = changes.status.unwrap_or(current.status);
        let amount_cents = changes.amount_cents.unwrap_or(current.amount_cents);

        let case = sqlx::query_as::<_, Case>(
            r#"
            UPDATE cases
            SET status = $1, amount_cents = $2, updated_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(amount_cents)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        recompute_summary(&mut *tx, case.user_id)
            .await
            .map_err(|e| LedgerError::ConsistencyWrite(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| LedgerError::ConsistencyWrite(e.to_string()))?;

        Ok(case)
    }

    /// Get a single case by ID
    pub async fn get_case(&self, id: Uuid) -> Result<Option<Case>, LedgerError> {
        let case = sqlx::query_as::<_, Case>("SELECT * FROM cases WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(case)
    }

    /// Look up the case linked to a submission, if any
    pub async fn find_by_submission(
        &self,
        submission_id: Uuid,
    ) -> Result<Option<Case>, LedgerError> {
        let case = sqlx::query_as::<_, Case>("SELECT * FROM cases WHERE submission_id = $1")
            .bind(submission_id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(case)
    }

    /// List cases with filtering and pagination
    pub async fn list_cases(&self, query: ListCasesQuery) -> Result<Vec<Case>, LedgerError> {
        let (limit, offset) = page_window(query.page, query.limit);

        let mut query_builder: sqlx::QueryBuilder<sqlx::Postgres> =
            sqlx::QueryBuilder::new("SELECT * FROM cases WHERE 1=1");

        if let Some(user_id) = query.user_id {
            query_builder.push(" AND user_id = ");
            query_builder.push_bind(user_id);
        }
        if let Some(status) = query.status {
            query_builder.push(" AND status = ");
            query_builder.push_bind(status);
        }

        query_builder.push(" ORDER BY created_at DESC LIMIT ");
        query_builder.push_bind(limit);
        query_builder.push(" OFFSET ");
        query_builder.push_bind(offset);

        let cases = query_builder
            .build_query_as::<Case>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(cases)
    }

    /// Email address of a case owner, for notifications
    pub async fn user_email(&self, user_id: Uuid) -> Result<Option<String>, LedgerError> {
        let email = sqlx::query_scalar::<_, String>("SELECT email FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(email)
    }

    /// Find a user by email, for resolving submission promotion owners
    pub async fn find_user_id_by_email(&self, email: &str) -> Result<Option<Uuid>, LedgerError> {
        let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(id)
    }
}

/// Whether a database error is the unique index on `cases.case_number`
/// rejecting a collision
fn is_case_number_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            db.code().as_deref() == Some("23505")
                && db.constraint().is_some_and(|c| c.contains("case_number"))
        }
        _ => false,
    }
}

/// Clamp raw pagination parameters into a LIMIT/OFFSET pair.
///
/// The offset is computed in i64 so a huge page number from the query string
/// cannot overflow; it just addresses past the end of the table.
pub(crate) fn page_window(page: Option<i32>, limit: Option<i32>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(20).clamp(1, 100) as i64;
    let offset = (page as i64 - 1).saturating_mul(limit);
    (limit, offset)
}
