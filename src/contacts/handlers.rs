use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::extractors::AuthUser,
    contacts::{
        dto::{ContactPayload, CreatedContact, MessageResponse},
        repo::{self, Contact},
    },
    error::ApiError,
    state::AppState,
};

pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/contact", post(create_contact))
        .route("/contacts", get(list_contacts))
        .route("/contact/:id", put(update_contact))
        .route("/contact/:id", delete(delete_contact))
}

/// Translate a phone uniqueness violation into its friendly message; every
/// other store error passes through with the driver's text.
fn map_phone_conflict(e: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return ApiError::Conflict("This phone number is already booked".into());
        }
    }
    ApiError::Database(e)
}

#[instrument(skip(state, payload))]
pub async fn create_contact(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ContactPayload>,
) -> Result<(StatusCode, Json<CreatedContact>), ApiError> {
    let id = repo::insert(
        &state.db,
        user_id,
        &payload.name,
        &payload.last_name,
        &payload.phone,
    )
    .await
    .map_err(map_phone_conflict)?;

    info!(%user_id, contact_id = %id, "contact created");
    Ok((StatusCode::CREATED, Json(CreatedContact { id })))
}

#[instrument(skip(state))]
pub async fn list_contacts(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Contact>>, ApiError> {
    let contacts = repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(contacts))
}

#[instrument(skip(state, payload))]
pub async fn update_contact(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<ContactPayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    // Ownership guard: re-fetch by (id, user_id) before mutating by id
    // alone. Not atomic with the update; accepted for this workload.
    if repo::find_owned(&state.db, id, user_id).await?.is_none() {
        warn!(%user_id, contact_id = %id, "update of non-owned contact");
        return Err(ApiError::NotFound("Contact not found"));
    }

    repo::update(&state.db, id, &payload.name, &payload.last_name, &payload.phone)
        .await
        .map_err(map_phone_conflict)?;

    info!(%user_id, contact_id = %id, "contact updated");
    Ok(Json(MessageResponse {
        message: "Contact updated",
    }))
}

#[instrument(skip(state))]
pub async fn delete_contact(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if repo::find_owned(&state.db, id, user_id).await?.is_none() {
        warn!(%user_id, contact_id = %id, "delete of non-owned contact");
        return Err(ApiError::NotFound("Contact not found"));
    }

    repo::delete(&state.db, id).await?;

    info!(%user_id, contact_id = %id, "contact deleted");
    Ok(Json(MessageResponse {
        message: "Contact deleted",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::error::Error as StdError;
    use std::fmt;

    /// Minimal database error carrying only a kind, enough to drive the
    /// structured unique-violation check.
    #[derive(Debug)]
    struct StubDbError {
        unique: bool,
    }

    impl fmt::Display for StubDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message())
        }
    }

    impl StdError for StubDbError {}

    impl DatabaseError for StubDbError {
        fn message(&self) -> &str {
            if self.unique {
                "duplicate key value violates unique constraint"
            } else {
                "relation does not exist"
            }
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::Other
            }
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn unique_violation_becomes_booked_phone_message() {
        let db_err = sqlx::Error::Database(Box::new(StubDbError { unique: true }));
        let mapped = map_phone_conflict(db_err);
        match mapped {
            ApiError::Conflict(msg) => {
                assert_eq!(msg, "This phone number is already booked");
            }
            other => panic!("expected Conflict, got {:?}", other),
        }
    }

    #[test]
    fn other_database_errors_pass_through() {
        let db_err = sqlx::Error::Database(Box::new(StubDbError { unique: false }));
        assert!(matches!(map_phone_conflict(db_err), ApiError::Database(_)));

        // Non-database driver errors are never translated either.
        assert!(matches!(
            map_phone_conflict(sqlx::Error::RowNotFound),
            ApiError::Database(_)
        ));
    }

    #[tokio::test]
    async fn ownership_miss_renders_contact_not_found() {
        // The response the update/delete handlers produce when find_owned
        // comes back empty.
        let response = ApiError::NotFound("Contact not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json, serde_json::json!({ "error": "Contact not found" }));
    }

    #[tokio::test]
    async fn conflict_renders_500_with_friendly_message() {
        let response =
            ApiError::Conflict("This phone number is already booked".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(
            json,
            serde_json::json!({ "error": "This phone number is already booked" })
        );
    }
}
