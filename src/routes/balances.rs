//! Balance summary route definitions

use axum::{
    routing::{get, put},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn balance_routes() -> Router<AppState> {
    Router::new()
        .route("/api/balances/:user_id", get(get_balance_summary))
        .route("/api/balances/:user_id/recovery", put(set_recovery))
}
