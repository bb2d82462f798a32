//! Submission API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AdminUser;
use crate::models::ApiResponse;
use crate::state::AppState;
use crate::submissions::{
    CreateSubmissionRequest, ListSubmissionsQuery, Submission, UpdateSubmissionRequest,
};

/// Create an intake submission.
///
/// This is the public intake form; no authentication required.
pub async fn create_submission(
    State(app_state): State<AppState>,
    Json(request): Json<CreateSubmissionRequest>,
) -> ApiResult<Json<ApiResponse<Submission>>> {
    let submission = app_state
        .submission_service
        .create_submission(request)
        .await?;

    Ok(Json(ApiResponse::ok(submission)))
}

/// Get a single submission (admin only)
pub async fn get_submission(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Submission>>> {
    let submission = app_state
        .submission_service
        .get_submission(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("submission".to_string()))?;

    Ok(Json(ApiResponse::ok(submission)))
}

/// List submissions (admin only)
pub async fn list_submissions(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<ListSubmissionsQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Submission>>>> {
    let submissions = app_state.submission_service.list_submissions(query).await?;

    Ok(Json(ApiResponse::ok(submissions)))
}

/// Triage a submission (admin only).
///
/// Status changes flow through to the linked case, promoting the submission
/// when the requester has a registered account.
pub async fn update_submission(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSubmissionRequest>,
) -> ApiResult<Json<ApiResponse<Submission>>> {
    let submission = app_state
        .submission_service
        .update_submission(id, request)
        .await?;

    app_state.notifier.submission_updated(&submission).await;

    Ok(Json(ApiResponse::ok(submission)))
}
