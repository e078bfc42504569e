use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{CreatedUser, CredentialsRequest, TokenResponse},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::User,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// No field-level validation beyond what the store enforces; a username
/// uniqueness violation surfaces as a generic store error, not a
/// special-cased conflict.
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<CreatedUser>), ApiError> {
    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload.username, &hash).await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(CreatedUser { id: user.id })))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = match User::find_by_username(&state.db, &payload.username).await? {
        Some(u) => u,
        None => {
            warn!(username = %payload.username, "login unknown username");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(TokenResponse { token }))
}
