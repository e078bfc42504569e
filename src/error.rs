use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

/// Error type returned by every handler. Each variant maps to one status
/// code and a JSON body of the form `{"error": <message>}`. No error is
/// retried; every one is terminal for the current request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No bearer credential was presented.
    #[error("Access denied")]
    Unauthorized,

    /// A credential was presented but failed verification (forged,
    /// malformed, or expired).
    #[error("Invalid token")]
    InvalidToken,

    /// Unknown username or wrong password. One uniform message for both, so
    /// login does not disclose which usernames exist.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Ownership or existence miss.
    #[error("{0}")]
    NotFound(&'static str),

    /// Duplicate unique field, translated to a friendly message. The wire
    /// contract reports these as 500, matching the deployed clients.
    #[error("{0}")]
    Conflict(String),

    /// Store failure, surfaced with the driver's message.
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Hashing or signing failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken | ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) | ApiError::Database(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Unauthorized => warn!("request without credential"),
            ApiError::InvalidToken => warn!("invalid or expired token"),
            ApiError::InvalidCredentials => warn!("login with invalid credentials"),
            ApiError::NotFound(msg) => warn!(%msg, "not found"),
            ApiError::Conflict(msg) => warn!(%msg, "unique constraint conflict"),
            ApiError::Database(e) => error!(error = %e, "database error"),
            ApiError::Internal(e) => error!(error = %e, "internal error"),
        }
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_wire_contract() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidToken.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("Contact not found").status_code(),
            StatusCode::NOT_FOUND
        );
        // Duplicate-key conflicts are pinned to 500 by the deployed clients.
        assert_eq!(
            ApiError::Conflict("This phone number is already booked".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_are_client_facing() {
        assert_eq!(ApiError::Unauthorized.to_string(), "Access denied");
        assert_eq!(ApiError::InvalidToken.to_string(), "Invalid token");
        assert_eq!(
            ApiError::InvalidCredentials.to_string(),
            "Invalid credentials"
        );
        assert_eq!(
            ApiError::NotFound("Contact not found").to_string(),
            "Contact not found"
        );
    }
}
