//! Risk assessment scoring
//!
//! Pure lookup-table scorer over category, amount, and description keywords.
//! No persistence; every assessment is computed from the request alone.

use serde::{Deserialize, Serialize};

use crate::cases::{parse_amount_cents, ScamCategory};
use crate::error::LedgerError;

/// Risk tier derived from the numeric score
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=24 => RiskLevel::Low,
            25..=49 => RiskLevel::Medium,
            50..=74 => RiskLevel::High,
            _ => RiskLevel::Critical,
        }
    }
}

/// Request DTO for a risk assessment
#[derive(Debug, Deserialize)]
pub struct RiskAssessmentRequest {
    pub scam_category: String,
    /// Dollar amount as entered, e.g. "2500.00"
    pub amount: String,
    pub description: String,
}

/// Assessment result
#[derive(Debug, Serialize, Clone)]
pub struct RiskAssessment {
    pub score: u32,
    pub level: RiskLevel,
    pub indicators: Vec<String>,
}

/// Description keywords and the indicator text reported when they match
const KEYWORD_INDICATORS: &[(&str, &str)] = &[
    ("gift card", "Payment via gift cards"),
    ("wire transfer", "Wire transfer payment"),
    ("crypto", "Cryptocurrency involved"),
    ("bitcoin", "Cryptocurrency involved"),
    ("urgent", "Urgency pressure tactics"),
    ("whatsapp", "Contact over messaging apps"),
    ("telegram", "Contact over messaging apps"),
    ("guaranteed return", "Guaranteed-returns promise"),
];

fn category_base_score(category: ScamCategory) -> u32 {
    match category {
        ScamCategory::InvestmentFraud => 35,
        ScamCategory::CryptoScam => 35,
        ScamCategory::RomanceScam => 30,
        ScamCategory::ImpersonationScam => 25,
        ScamCategory::TechSupportScam => 20,
        ScamCategory::Phishing => 20,
        ScamCategory::LotteryScam => 15,
        ScamCategory::EmploymentScam => 15,
        ScamCategory::Other => 10,
    }
}

fn amount_score(amount_cents: i64) -> (u32, Option<&'static str>) {
    if amount_cents >= 10_000_000 {
        (15, Some("Very large reported loss"))
    } else if amount_cents >= 1_000_000 {
        (10, Some("Large reported loss"))
    } else if amount_cents >= 100_000 {
        (5, None)
    } else {
        (0, None)
    }
}

/// Score a reported scam.
///
/// The score is capped at 100 and mapped onto a tier; indicators explain
/// which signals contributed.
pub fn assess(category: ScamCategory, amount_cents: i64, description: &str) -> RiskAssessment {
    let mut score = category_base_score(category);
    let mut indicators = vec![format!("Category: {}", category.canonical_label())];

    let (amount_points, amount_indicator) = amount_score(amount_cents);
    score += amount_points;
    if let Some(indicator) = amount_indicator {
        indicators.push(indicator.to_string());
    }

    let haystack = description.to_lowercase();
    for (keyword, indicator) in KEYWORD_INDICATORS {
        if haystack.contains(keyword) && !indicators.iter().any(|i| i == indicator) {
            score += 10;
            indicators.push((*indicator).to_string());
        }
    }

    let score = score.min(100);

    RiskAssessment {
        score,
        level: RiskLevel::from_score(score),
        indicators,
    }
}

impl RiskAssessmentRequest {
    /// Parse and score the request
    pub fn assess(&self) -> Result<RiskAssessment, LedgerError> {
        let amount_cents = parse_amount_cents(&self.amount)
            .map_err(|msg| LedgerError::validation("amount", msg))?;
        let category = ScamCategory::from_label(&self.scam_category);

        Ok(assess(category, amount_cents, &self.description))
    }
}
