//! Submission service layer - intake, triage, and case promotion
//!
//! Triage updates are the primary write; promoting a submission into a case
//! (or syncing its linked case) is a follow-up step whose failure is logged
//! and never rolls the triage update back.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::cases::{CaseChanges, CaseService};
use crate::error::LedgerError;
use crate::submissions::{
    CreateSubmissionRequest, ListSubmissionsQuery, Submission, SubmissionStatus,
    UpdateSubmissionRequest,
};

/// Service for intake submissions
#[derive(Clone)]
pub struct SubmissionService {
    db_pool: PgPool,
    case_service: CaseService,
}

impl SubmissionService {
    pub fn new(db_pool: PgPool, case_service: CaseService) -> Self {
        Self {
            db_pool,
            case_service,
        }
    }

    /// Validate and persist a public intake submission with status `pending`
    pub async fn create_submission(
        &self,
        request: CreateSubmissionRequest,
    ) -> Result<Submission, LedgerError> {
        let new_submission = request.validate_request()?;
        let now = Utc::now();

        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions (
                id, requester_name, requester_email, requester_phone,
                scam_category, amount_cents, description, evidence_text,
                status, admin_notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NULL, $10, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_submission.requester_name)
        .bind(&new_submission.requester_email)
        .bind(&new_submission.requester_phone)
        .bind(&new_submission.scam_category)
        .bind(new_submission.amount_cents)
        .bind(&new_submission.description)
        .bind(&new_submission.evidence_text)
        .bind(SubmissionStatus::Pending)
        .bind(now)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(submission)
    }

    /// Get a single submission by ID
    pub async fn get_submission(&self, id: Uuid) -> Result<Option<Submission>, LedgerError> {
        let submission = sqlx::query_as::<_, Submission>("SELECT * FROM submissions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(submission)
    }

    /// List submissions with filtering and pagination
    pub async fn list_submissions(
        &self,
        query: ListSubmissionsQuery,
    ) -> Result<Vec<Submission>, LedgerError> {
        let (limit, offset) = crate::cases::page_window(query.page, query.limit);

        let mut query_builder: sqlx::QueryBuilder<sqlx::Postgres> =
            sqlx::QueryBuilder::new("SELECT * FROM submissions WHERE 1=1");

        if let Some(status) = query.status {
            query_builder.push(" AND status = ");
            query_builder.push_bind(status);
        }

        query_builder.push(" ORDER BY created_at DESC LIMIT ");
        query_builder.push_bind(limit);
        query_builder.push(" OFFSET ");
        query_builder.push_bind(offset);

        let submissions = query_builder
            .build_query_as::<Submission>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(submissions)
    }

    /// Apply administrator triage changes, then sync or promote the linked
    /// case.
    ///
    /// The returned submission reflects the triage write even when the
    /// promotion step fails.
    pub async fn update_submission(
        &self,
        id: Uuid,
        changes: UpdateSubmissionRequest,
    ) -> Result<Submission, LedgerError> {
        let current = self
            .get_submission(id)
            .await?
            .ok_or(LedgerError::NotFound("submission"))?;

        let status = changes.status.unwrap_or(current.status);
        let admin_notes = match changes.admin_notes {
            Some(notes) => {
                let trimmed = notes.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            None => current.admin_notes.clone(),
        };

        let submission = sqlx::query_as::<_, Submission>(
            r#"
            UPDATE submissions
            SET status = $1, admin_notes = $2, updated_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(&admin_notes)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.db_pool)
        .await?;

        if let Err(e) = self.sync_case(&submission).await {
            tracing::warn!(
                submission_id = %submission.id,
                error = %e,
                "Case promotion failed after submission update"
            );
        }

        Ok(submission)
    }

    /// Promote a submission into a case, or sync an already-promoted one.
    ///
    /// The case owner is the registered user whose email matches the
    /// requester's. Submissions from unregistered requesters stay unpromoted
    /// until an account exists.
    async fn sync_case(&self, submission: &Submission) -> Result<(), LedgerError> {
        let case_status = submission.status.as_case_status();

        if let Some(case) = self.case_service.find_by_submission(submission.id).await? {
            self.case_service
                .update_case(
                    case.id,
                    CaseChanges {
                        status: Some(case_status),
                        amount_cents: Some(submission.amount_cents),
                    },
                )
                .await?;
            return Ok(());
        }

        let Some(user_id) = self
            .case_service
            .find_user_id_by_email(&submission.requester_email)
            .await?
        else {
            tracing::debug!(
                submission_id = %submission.id,
                "No registered user for submission email, skipping promotion"
            );
            return Ok(());
        };

        let case = self
            .case_service
            .create_from_submission(user_id, submission, case_status)
            .await?;

        tracing::info!(
            submission_id = %submission.id,
            case_id = %case.id,
            case_number = %case.case_number,
            "Submission promoted to case"
        );

        Ok(())
    }
}
