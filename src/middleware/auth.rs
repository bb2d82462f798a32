//! Authentication middleware
//!
//! Extractors that verify the bearer token and hand handlers a request-scoped
//! identity. The ledger services trust this identity as given; authorization
//! is "self for end users, any user for admins".

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{get_user_id_from_claims, verify_token};
use crate::models::UserRole;

/// Verification settings the extractors pull out of application state
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Authenticated user extracted from the bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// Whether this caller may read or write data belonging to `owner_id`
    pub fn can_access(&self, owner_id: Uuid) -> bool {
        self.user_id == owner_id || matches!(self.role, UserRole::Admin)
    }
}

/// Error response for authentication failures
#[derive(Debug, Serialize)]
struct AuthError {
    error: AuthErrorDetails,
}

#[derive(Debug, Serialize)]
struct AuthErrorDetails {
    code: String,
    message: String,
}

impl AuthError {
    fn new(code: &str, message: &str) -> Self {
        Self {
            error: AuthErrorDetails {
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(self)).into_response()
    }
}

/// Extractor for authenticated users
///
/// Verifies the JWT from the Authorization header and extracts the caller's
/// identity.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(user: AuthenticatedUser) -> impl IntoResponse {
///     format!("Hello, user {}", user.user_id)
/// }
/// ```
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract the Authorization header
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AuthError::new(
                        "MISSING_TOKEN",
                        "Authorization header with Bearer token required",
                    )
                    .into_response()
                })?;

        let auth_config = AuthConfig::from_ref(state);

        // Verify the token
        let claims = verify_token(bearer.token(), &auth_config.jwt_secret).map_err(|e| {
            let (code, message) = match e.to_string().as_str() {
                s if s.contains("expired") => ("TOKEN_EXPIRED", "Token has expired"),
                _ => ("INVALID_TOKEN", "Invalid token"),
            };
            AuthError::new(code, message).into_response()
        })?;

        let user_id = get_user_id_from_claims(&claims).map_err(|_| {
            AuthError::new("INVALID_TOKEN", "Invalid user ID in token").into_response()
        })?;

        let role = match claims.role.as_str() {
            "user" => UserRole::User,
            "admin" => UserRole::Admin,
            _ => {
                return Err(AuthError::new("INVALID_TOKEN", "Invalid role in token").into_response())
            }
        };

        Ok(AuthenticatedUser {
            user_id,
            email: claims.email,
            role,
        })
    }
}

/// Extractor that additionally requires the admin role
pub struct AdminUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !matches!(user.role, UserRole::Admin) {
            return Err((
                StatusCode::FORBIDDEN,
                Json(AuthError::new("FORBIDDEN", "Admin access required")),
            )
                .into_response());
        }

        Ok(AdminUser(user))
    }
}
