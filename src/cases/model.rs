//! Case models and request/response DTOs

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use crate::cases::Evidence;
use crate::error::LedgerError;

/// Case model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Case {
    pub id: Uuid,
    pub case_number: String,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub scam_category: String,
    pub amount_cents: i64,
    pub status: CaseStatus,
    pub evidence: Option<Json<Evidence>>,
    pub submission_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Case lifecycle status
///
/// The expected flow is pending -> in_progress -> under_review -> approved ->
/// complete, with closed reachable from any non-complete state. There is
/// deliberately no transition-order guard: administrators may set any status
/// from any other.
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "case_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Pending,
    InProgress,
    UnderReview,
    Approved,
    Complete,
    Closed,
}

impl CaseStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, CaseStatus::Pending)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, CaseStatus::Complete)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Pending => "pending",
            CaseStatus::InProgress => "in_progress",
            CaseStatus::UnderReview => "under_review",
            CaseStatus::Approved => "approved",
            CaseStatus::Complete => "complete",
            CaseStatus::Closed => "closed",
        }
    }
}

/// Known scam categories. Free text is accepted at intake; known labels are
/// normalized to their canonical spelling, anything else passes through as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScamCategory {
    InvestmentFraud,
    RomanceScam,
    Phishing,
    CryptoScam,
    TechSupportScam,
    LotteryScam,
    EmploymentScam,
    ImpersonationScam,
    Other,
}

impl ScamCategory {
    /// Match a free-text label against the known categories
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "investment fraud" | "investment scam" => ScamCategory::InvestmentFraud,
            "romance scam" => ScamCategory::RomanceScam,
            "phishing" | "phishing scam" => ScamCategory::Phishing,
            "crypto scam" | "cryptocurrency scam" => ScamCategory::CryptoScam,
            "tech support scam" => ScamCategory::TechSupportScam,
            "lottery scam" | "lottery/prize scam" | "prize scam" => ScamCategory::LotteryScam,
            "employment scam" | "job scam" => ScamCategory::EmploymentScam,
            "impersonation scam" | "impersonation" => ScamCategory::ImpersonationScam,
            _ => ScamCategory::Other,
        }
    }

    pub fn canonical_label(&self) -> &'static str {
        match self {
            ScamCategory::InvestmentFraud => "Investment Fraud",
            ScamCategory::RomanceScam => "Romance Scam",
            ScamCategory::Phishing => "Phishing",
            ScamCategory::CryptoScam => "Crypto Scam",
            ScamCategory::TechSupportScam => "Tech Support Scam",
            ScamCategory::LotteryScam => "Lottery/Prize Scam",
            ScamCategory::EmploymentScam => "Employment Scam",
            ScamCategory::ImpersonationScam => "Impersonation Scam",
            ScamCategory::Other => "Other",
        }
    }

    /// Normalize a raw category string: canonical spelling for known labels,
    /// trimmed free text otherwise
    pub fn normalize(raw: &str) -> String {
        match ScamCategory::from_label(raw) {
            ScamCategory::Other => raw.trim().to_string(),
            known => known.canonical_label().to_string(),
        }
    }
}

/// Parse a user-supplied dollar amount into non-negative integer cents.
///
/// Accepts plain decimal strings ("2500", "2500.00", ".50"), an optional
/// leading dollar sign, and thousands separators, with at most two decimal
/// places.
pub fn parse_money_cents(raw: &str) -> Result<i64, String> {
    let s = raw.trim().trim_start_matches('$').replace(',', "");
    if s.is_empty() {
        return Err("amount is required".to_string());
    }

    if let Some(stripped) = s.strip_prefix('-') {
        if !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err("amount must not be negative".to_string());
        }
        return Err("amount must be a number".to_string());
    }

    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s.as_str(), ""),
    };

    if (int_part.is_empty() && frac_part.is_empty())
        || !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
        || frac_part.len() > 2
    {
        return Err("amount must be a dollar amount with at most two decimal places".to_string());
    }

    let dollars: i64 = if int_part.is_empty() {
        0
    } else {
        int_part
            .parse()
            .map_err(|_| "amount is too large".to_string())?
    };

    let cents_frac: i64 = match frac_part.len() {
        0 => 0,
        1 => frac_part.parse::<i64>().unwrap_or(0) * 10,
        _ => frac_part.parse::<i64>().unwrap_or(0),
    };

    dollars
        .checked_mul(100)
        .and_then(|c| c.checked_add(cents_frac))
        .ok_or_else(|| "amount is too large".to_string())
}

/// Like [`parse_money_cents`], but the amount must be strictly positive
pub fn parse_amount_cents(raw: &str) -> Result<i64, String> {
    let cents = parse_money_cents(raw)?;
    if cents == 0 {
        return Err("amount must be greater than zero".to_string());
    }
    Ok(cents)
}

/// Request DTO for creating a case
#[derive(Debug, Deserialize)]
pub struct CreateCaseRequest {
    pub title: String,
    pub description: String,
    pub scam_category: String,
    /// Dollar amount as entered, e.g. "2500.00"
    pub amount: String,
    /// Raw evidence payload; normalized at the boundary
    pub evidence: Option<String>,
}

/// Validated and normalized case attributes, ready to persist
#[derive(Debug, Clone)]
pub struct NewCase {
    pub title: String,
    pub description: String,
    pub scam_category: String,
    pub amount_cents: i64,
    pub evidence: Option<Evidence>,
}

impl CreateCaseRequest {
    /// Validate the request, returning field-identified errors. No write
    /// happens unless this succeeds.
    pub fn validate(&self) -> Result<NewCase, LedgerError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(LedgerError::validation("title", "must not be empty"));
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

        let evidence = self
            .evidence
            .as_deref()
            .map(Evidence::from_raw)
            .filter(|e| !e.is_empty());

        Ok(NewCase {
            title: title.to_string(),
            description: description.to_string(),
            scam_category: ScamCategory::normalize(&self.scam_category),
            amount_cents,
            evidence,
        })
    }
}

/// Request DTO for administrator case updates
#[derive(Debug, Deserialize)]
pub struct UpdateCaseRequest {
    pub status: Option<CaseStatus>,
    /// Replacement dollar amount, if the administrator corrects it
    pub amount: Option<String>,
}

/// Parsed administrator changes applied to a case
#[derive(Debug, Clone, Copy)]
pub struct CaseChanges {
    pub status: Option<CaseStatus>,
    pub amount_cents: Option<i64>,
}

impl UpdateCaseRequest {
    pub fn into_changes(self) -> Result<CaseChanges, LedgerError> {
        let amount_cents = match self.amount.as_deref() {
            Some(raw) => Some(
                parse_amount_cents(raw).map_err(|msg| LedgerError::validation("amount", msg))?,
            ),
            None => None,
        };

        Ok(CaseChanges {
            status: self.status,
            amount_cents,
        })
    }
}

/// Query parameters for listing cases
#[derive(Debug, Deserialize)]
pub struct ListCasesQuery {
    pub user_id: Option<Uuid>,
    pub status: Option<CaseStatus>,
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateCaseRequest {
        CreateCaseRequest {
            title: "Fake dating app".to_string(),
            description: "Met on an app, convinced me to invest".to_string(),
            scam_category: "Romance Scam".to_string(),
            amount: "2500.00".to_string(),
            evidence: None,
        }
    }

    #[test]
    fn test_parse_amount_cents_valid() {
        assert_eq!(parse_amount_cents("2500.00").unwrap(), 250_000);
        assert_eq!(parse_amount_cents("2500").unwrap(), 250_000);
        assert_eq!(parse_amount_cents("0.01").unwrap(), 1);
        assert_eq!(parse_amount_cents(".50").unwrap(), 50);
        assert_eq!(parse_amount_cents("10.5").unwrap(), 1_050);
        assert_eq!(parse_amount_cents(" $1,000.50 ").unwrap(), 100_050);
    }

    #[test]
    fn test_parse_amount_cents_rejects_non_positive() {
        assert!(parse_amount_cents("-5").is_err());
        assert!(parse_amount_cents("0").is_err());
        assert!(parse_amount_cents("0.00").is_err());
    }

    #[test]
    fn test_parse_amount_cents_rejects_malformed() {
        assert!(parse_amount_cents("").is_err());
        assert!(parse_amount_cents("abc").is_err());
        assert!(parse_amount_cents("12.345").is_err());
        assert!(parse_amount_cents("1.2.3").is_err());
    }

    #[test]
    fn test_validate_ok() {
        let new_case = valid_request().validate().unwrap();
        assert_eq!(new_case.amount_cents, 250_000);
        assert_eq!(new_case.scam_category, "Romance Scam");
        assert!(new_case.evidence.is_none());
    }

    #[test]
    fn test_validate_rejects_empty_title() {
        let mut request = valid_request();
        request.title = "   ".to_string();
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_validate_rejects_empty_description() {
        let mut request = valid_request();
        request.description = String::new();
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_validate_normalizes_category() {
        let mut request = valid_request();
        request.scam_category = "romance scam".to_string();
        let new_case = request.validate().unwrap();
        assert_eq!(new_case.scam_category, "Romance Scam");

        let mut request = valid_request();
        request.scam_category = "Pig Butchering".to_string();
        let new_case = request.validate().unwrap();
        assert_eq!(new_case.scam_category, "Pig Butchering");
    }

    #[test]
    fn test_validate_normalizes_evidence() {
        let mut request = valid_request();
        request.evidence = Some("https://cdn.example.com/proof.png\nchat log attached".to_string());
        let new_case = request.validate().unwrap();
        let evidence = new_case.evidence.unwrap();
        assert_eq!(evidence.attachments.len(), 1);
        assert_eq!(evidence.notes.as_deref(), Some("chat log attached"));
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&CaseStatus::InProgress).unwrap();
        assert_eq!(json, r#""in_progress""#);
        let status: CaseStatus = serde_json::from_str(r#""under_review""#).unwrap();
        assert_eq!(status, CaseStatus::UnderReview);
    }

    #[test]
    fn test_update_request_parses_amount() {
        let request = UpdateCaseRequest {
            status: Some(CaseStatus::Complete),
            amount: Some("99.99".to_string()),
        };
        let changes = request.into_changes().unwrap();
        assert_eq!(changes.status, Some(CaseStatus::Complete));
        assert_eq!(changes.amount_cents, Some(9_999));

        let request = UpdateCaseRequest {
            status: None,
            amount: Some("-1".to_string()),
        };
        assert!(request.into_changes().is_err());
    }
}
