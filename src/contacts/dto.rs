use serde::{Deserialize, Serialize};

/// Request body for creating or updating a contact.
#[derive(Debug, Deserialize)]
pub struct ContactPayload {
    pub name: String,
    pub last_name: String,
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedContact {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
