//! Submission models and request DTOs

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::cases::{parse_amount_cents, CaseStatus, ScamCategory};
use crate::error::LedgerError;

/// Intake submission model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Submission {
    pub id: Uuid,
    pub requester_name: String,
    pub requester_email: String,
    pub requester_phone: Option<String>,
    pub scam_category: String,
    pub amount_cents: i64,
    pub description: String,
    pub evidence_text: Option<String>,
    pub status: SubmissionStatus,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submission triage status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "submission_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl SubmissionStatus {
    /// The case status a linked case should carry for this submission status
    pub fn as_case_status(&self) -> CaseStatus {
        match self {
            SubmissionStatus::Pending => CaseStatus::Pending,
            SubmissionStatus::InProgress => CaseStatus::InProgress,
            SubmissionStatus::Resolved => CaseStatus::Complete,
            SubmissionStatus::Rejected => CaseStatus::Closed,
        }
    }
}

/// Request DTO for the public intake form
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubmissionRequest {
    #[validate(length(min = 1, max = 200, message = "must not be empty"))]
    pub requester_name: String,

    #[validate(email(message = "must be a valid email address"))]
    pub requester_email: String,

    #[validate(length(max = 40))]
    pub requester_phone: Option<String>,

    pub scam_category: String,

    /// Dollar amount as entered, e.g. "2500.00"
    pub amount: String,

    pub description: String,

    #[validate(length(max = 10000))]
    pub evidence_text: Option<String>,
}

/// Validated and normalized submission attributes
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub requester_name: String,
    pub requester_email: String,
    pub requester_phone: Option<String>,
    pub scam_category: String,
    pub amount_cents: i64,
    pub description: String,
    pub evidence_text: Option<String>,
}

impl CreateSubmissionRequest {
    pub fn validate_request(&self) -> Result<NewSubmission, LedgerError> {
        if let Err(errors) = self.validate() {
            let field = errors
                .field_errors()
                .keys()
                .next()
                .copied()
                .unwrap_or("request");
            return Err(LedgerError::Validation {
                field,
                message: errors.to_string(),
            });
        }

        let name = self.requester_name.trim();
        if name.is_empty() {
            return Err(LedgerError::validation("requester_name", "must not be empty"));
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err(LedgerError::validation("description", "must not be empty"));
        }

        if self.scam_category.trim().is_empty() {
            return Err(LedgerError::validation("scam_category", "must not be empty"));
        }

        let amount_cents = parse_amount_cents(&self.amount)
            .map_err(|msg| LedgerError::validation("amount", msg))?;

        Ok(NewSubmission {
            requester_name: name.to_string(),
            requester_email: self.requester_email.trim().to_lowercase(),
            requester_phone: self
                .requester_phone
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            scam_category: ScamCategory::normalize(&self.scam_category),
            amount_cents,
            description: description.to_string(),
            evidence_text: self
                .evidence_text
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }
}

/// Request DTO for administrator triage updates
#[derive(Debug, Deserialize)]
pub struct UpdateSubmissionRequest {
    pub status: Option<SubmissionStatus>,
    pub admin_notes: Option<String>,
}

/// Query parameters for listing submissions
#[derive(Debug, Deserialize)]
pub struct ListSubmissionsQuery {
    pub status: Option<SubmissionStatus>,
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateSubmissionRequest {
        CreateSubmissionRequest {
            requester_name: "Alex Doe".to_string(),
            requester_email: "Alex.Doe@Example.com".to_string(),
            requester_phone: Some("+1 555 0100".to_string()),
            scam_category: "crypto scam".to_string(),
            amount: "1200".to_string(),
            description: "Sent funds to a fake exchange".to_string(),
            evidence_text: None,
        }
    }

    #[test]
    fn test_validate_ok() {
        let new_submission = valid_request().validate_request().unwrap();
        assert_eq!(new_submission.requester_email, "alex.doe@example.com");
        assert_eq!(new_submission.scam_category, "Crypto Scam");
        assert_eq!(new_submission.amount_cents, 120_000);
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let mut request = valid_request();
        request.requester_email = "not-an-email".to_string();
        assert!(request.validate_request().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_amount() {
        for bad in ["-5", "0", "lots"] {
            let mut request = valid_request();
            request.amount = bad.to_string();
            assert!(request.validate_request().is_err(), "amount {:?}", bad);
        }
    }

    #[test]
    fn test_validate_rejects_empty_description() {
        let mut request = valid_request();
        request.description = "  ".to_string();
        assert!(request.validate_request().is_err());
    }

    #[test]
    fn test_status_to_case_status() {
        assert_eq!(
            SubmissionStatus::Pending.as_case_status(),
            CaseStatus::Pending
        );
        assert_eq!(
            SubmissionStatus::InProgress.as_case_status(),
            CaseStatus::InProgress
        );
        assert_eq!(
            SubmissionStatus::Resolved.as_case_status(),
            CaseStatus::Complete
        );
        assert_eq!(
            SubmissionStatus::Rejected.as_case_status(),
            CaseStatus::Closed
        );
    }
}
