//! Risk assessment route definitions

use axum::{routing::post, Router};

use crate::handlers::*;
use crate::state::AppState;

pub fn risk_routes() -> Router<AppState> {
    Router::new().route("/api/risk/assess", post(assess_risk))
}
