//! Balance summary API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::balances::{BalanceSummary, SetRecoveryRequest};
use crate::error::{ApiError, ApiResult};
use crate::middleware::{AdminUser, AuthenticatedUser};
use crate::models::ApiResponse;
use crate::state::AppState;

/// Get a user's balance summary
pub async fn get_balance_summary(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<BalanceSummary>>> {
    if !user.can_access(user_id) {
        return Err(ApiError::Forbidden(
            "You do not have access to this balance summary".to_string(),
        ));
    }

    let summary = app_state.balance_service.get_for_user(user_id).await?;

    Ok(Json(ApiResponse::ok(summary)))
}

/// Record a recovered amount on a user's summary (admin only)
pub async fn set_recovery(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(user_id): Path<Uuid>,
    Json(request): Json<SetRecoveryRequest>,
) -> ApiResult<Json<ApiResponse<BalanceSummary>>> {
    let (amount_recovered_cents, notes) = request.validate()?;
    let summary = app_state
        .balance_service
        .set_recovery(user_id, amount_recovered_cents, notes)
        .await?;

    Ok(Json(ApiResponse::ok(summary)))
}
