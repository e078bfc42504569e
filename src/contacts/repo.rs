use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Contact record, owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub last_name: String,
    pub phone: String,
}

/// All contacts belonging to one user, in store-native order.
pub async fn list_by_user(db: &PgPool, user_id: i64) -> sqlx::Result<Vec<Contact>> {
    sqlx::query_as::<_, Contact>(
        r#"
        SELECT id, user_id, name, last_name, phone
        FROM contacts
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Fetch a contact by id, filtered by owner. The ownership guard for
/// update/delete: no row means the id does not exist or belongs to someone
/// else, and the caller cannot tell which.
pub async fn find_owned(db: &PgPool, id: i64, user_id: i64) -> sqlx::Result<Option<Contact>> {
    sqlx::query_as::<_, Contact>(
        r#"
        SELECT id, user_id, name, last_name, phone
        FROM contacts
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
}

pub async fn insert(
    db: &PgPool,
    user_id: i64,
    name: &str,
    last_name: &str,
    phone: &str,
) -> sqlx::Result<i64> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO contacts (user_id, name, last_name, phone)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(last_name)
    .bind(phone)
    .fetch_one(db)
    .await?;
    Ok(id)
}

/// Update by id alone; ownership must have been checked first.
pub async fn update(
    db: &PgPool,
    id: i64,
    name: &str,
    last_name: &str,
    phone: &str,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        UPDATE contacts
        SET name = $1, last_name = $2, phone = $3
        WHERE id = $4
        "#,
    )
    .bind(name)
    .bind(last_name)
    .bind(phone)
    .bind(id)
    .execute(db)
    .await?;
    Ok(())
}

/// Delete by id alone; ownership must have been checked first.
pub async fn delete(db: &PgPool, id: i64) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM contacts WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}
