//! HTTP middleware for the case ledger backend

pub mod auth;
mod security;
mod tracing;

pub use auth::{AdminUser, AuthConfig, AuthenticatedUser};
pub use security::security_headers;
pub use tracing::request_tracing;
