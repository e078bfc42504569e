use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::jwt::JwtKeys;
use crate::error::ApiError;

/// Authenticated identity for protected routes. Extracts the bearer token
/// from the `Authorization` header, verifies it, and yields the user id to
/// the handler. Stateless; rejects before the handler runs.
#[derive(Debug)]
pub struct AuthUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        // No token after the scheme prefix counts as a missing credential,
        // not an invalid one.
        let token = auth_header
            .strip_prefix("Bearer ")
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::Unauthorized)?;

        let keys = JwtKeys::from_ref(state);
        match keys.verify(token) {
            Ok(claims) => Ok(AuthUser(claims.sub)),
            Err(_) => {
                warn!("bearer token failed verification");
                Err(ApiError::InvalidToken)
            }
        }
    }
}
