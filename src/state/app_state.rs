//! Shared application state wired into the router

use std::sync::Arc;

use axum::extract::FromRef;

use crate::balances::BalanceService;
use crate::cases::CaseService;
use crate::middleware::AuthConfig;
use crate::notify::NotificationService;
use crate::submissions::SubmissionService;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    pub case_service: Arc<CaseService>,
    pub balance_service: Arc<BalanceService>,
    pub submission_service: Arc<SubmissionService>,
    pub notifier: Arc<NotificationService>,
    pub auth_config: AuthConfig,
}

impl AppState {
    pub fn new(
        case_service: CaseService,
        balance_service: BalanceService,
        submission_service: SubmissionService,
        notifier: NotificationService,
        auth_config: AuthConfig,
    ) -> Self {
        Self {
            case_service: Arc::new(case_service),
            balance_service: Arc::new(balance_service),
            submission_service: Arc::new(submission_service),
            notifier: Arc::new(notifier),
            auth_config,
        }
    }
}

// Lets the auth extractors pull their config straight out of state
impl FromRef<AppState> for AuthConfig {
    fn from_ref(state: &AppState) -> Self {
        state.auth_config.clone()
    }
}
