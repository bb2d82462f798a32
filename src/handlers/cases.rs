//! Case API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::cases::{Case, CreateCaseRequest, ListCasesQuery, UpdateCaseRequest};
use crate::error::{ApiError, ApiResult};
use crate::middleware::{AdminUser, AuthenticatedUser};
use crate::models::ApiResponse;
use crate::state::AppState;

/// Create a new recovery case owned by the caller
pub async fn create_case(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateCaseRequest>,
) -> ApiResult<Json<ApiResponse<Case>>> {
    let case = app_state
        .case_service
        .create_case(user.user_id, request)
        .await?;

    app_state.notifier.case_created(&user.email, &case).await;

    Ok(Json(ApiResponse::ok(case)))
}

/// Get a single case
pub async fn get_case(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Case>>> {
    let case = app_state
        .case_service
        .get_case(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("case".to_string()))?;

    if !user.can_access(case.user_id) {
        return Err(ApiError::Forbidden(
            "You do not have access to this case".to_string(),
        ));
    }

    Ok(Json(ApiResponse::ok(case)))
}

/// List cases.
///
/// End users see their own cases regardless of the `user_id` filter; admins
/// may filter across all users.
pub async fn list_cases(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(mut query): Query<ListCasesQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Case>>>> {
    if !matches!(user.role, crate::models::UserRole::Admin) {
        query.user_id = Some(user.user_id);
    }

    let cases = app_state.case_service.list_cases(query).await?;

    Ok(Json(ApiResponse::ok(cases)))
}

/// Update a case's status or amount (admin only)
pub async fn update_case(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCaseRequest>,
) -> ApiResult<Json<ApiResponse<Case>>> {
    let changes = request.into_changes()?;
    let case = app_state.case_service.update_case(id, changes).await?;

    if let Some(email) = app_state.case_service.user_email(case.user_id).await? {
        app_state.notifier.case_status_changed(&email, &case).await;
    }

    Ok(Json(ApiResponse::ok(case)))
}
