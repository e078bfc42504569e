use serde::{Deserialize, Serialize};

/// Request body for registration and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Response returned after registration.
#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub id: i64,
}

/// Response returned after login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
