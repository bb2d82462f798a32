//! Risk assessment API handlers

use axum::Json;

use crate::error::ApiResult;
use crate::middleware::AuthenticatedUser;
use crate::models::ApiResponse;
use crate::risk::{RiskAssessment, RiskAssessmentRequest};

/// Score a reported scam
pub async fn assess_risk(
    _user: AuthenticatedUser,
    Json(request): Json<RiskAssessmentRequest>,
) -> ApiResult<Json<ApiResponse<RiskAssessment>>> {
    let assessment = request.assess()?;

    Ok(Json(ApiResponse::ok(assessment)))
}
