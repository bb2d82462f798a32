//! Case route definitions

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn case_routes() -> Router<AppState> {
    Router::new()
        .route("/api/cases", post(create_case))
        .route("/api/cases", get(list_cases))
        .route("/api/cases/:id", get(get_case))
        .route("/api/cases/:id", put(update_case))
}
