//! Identity collaborator boundary
//!
//! The backend does not authenticate users itself; it verifies bearer tokens
//! issued by the auth provider and extracts a request-scoped identity.

mod jwt;

pub use jwt::{get_user_id_from_claims, verify_token, Claims, JwtError};
