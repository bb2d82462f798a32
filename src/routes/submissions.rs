//! Submission route definitions

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn submission_routes() -> Router<AppState> {
    Router::new()
        .route("/api/submissions", post(create_submission))
        .route("/api/submissions", get(list_submissions))
        .route("/api/submissions/:id", get(get_submission))
        .route("/api/submissions/:id", put(update_submission))
}
