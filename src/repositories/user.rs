use deadpool_postgres::Pool;
use tokio_postgres::error::SqlState;
use tokio_postgres::Row;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::user::User,
};

/// A helper function to map a `tokio_postgres::Row` to a `User`.
fn row_to_user(row: &Row) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password: row.try_get("password")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Creates a new user.
///
/// The existence check and the insert run inside one transaction so the
/// connection is held for the whole check-then-insert sequence; the unique
/// index on `LOWER(username)` still backs it up when two registrations race,
/// in which case the violation is reported as the same `Conflict`.
pub async fn create(pool: &Pool, username: &str, password_hash: &str) -> Result<User> {
    let mut client = pool.get().await?;
    let tx = client.transaction().await?;

    let existing = tx
        .query_opt(
            r#"
            SELECT 1
            FROM users
            WHERE LOWER(username) = LOWER($1)
            "#,
            &[&username],
        )
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict("Username already taken.".to_string()));
    }

    let id = Uuid::new_v4();
    let row = tx
        .query_one(
            r#"
            INSERT INTO users (id, username, password)
            VALUES ($1, $2, $3)
            RETURNING id, username, password, created_at
            "#,
            &[&id, &username, &password_hash],
        )
        .await
        .map_err(conflict_on_unique)?;

    tx.commit().await?;
    row_to_user(&row)
}

fn conflict_on_unique(e: tokio_postgres::Error) -> AppError {
    if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        AppError::Conflict("Username already taken.".to_string())
    } else {
        AppError::Postgres(e)
    }
}

/// Finds a user by username, matching case-insensitively.
pub async fn find_by_username(pool: &Pool, username: &str) -> Result<Option<User>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT id, username, password, created_at
            FROM users
            WHERE LOWER(username) = LOWER($1)
            "#,
            &[&username],
        )
        .await?;
    row.map(|r| row_to_user(&r)).transpose()
}

/// Finds a user by their ID.
pub async fn find_by_id(pool: &Pool, user_id: &Uuid) -> Result<Option<User>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT id, username, password, created_at
            FROM users
            WHERE id = $1
            "#,
            &[user_id],
        )
        .await?;
    row.map(|r| row_to_user(&r)).transpose()
}
