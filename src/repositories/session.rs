use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;
use crate::{
    error::Result,
    models::session::Session,
};

/// A helper function to map a `tokio_postgres::Row` to a `Session`.
fn row_to_session(row: &Row) -> Result<Session> {
    Ok(Session {
        id: row.try_get("id")?,
        token: row.try_get("token")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Persists a new session row. The `token` column carries a unique
/// constraint, so a collision surfaces as a database error rather than a
/// silent overwrite.
pub async fn create(pool: &Pool, token: &str, user_id: &Uuid) -> Result<Session> {
    let client = pool.get().await?;
    let id = Uuid::new_v4();
    let row = client
        .query_one(
            r#"
            INSERT INTO sessions (id, token, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, token, user_id, created_at
            "#,
            &[&id, &token, user_id],
        )
        .await?;
    row_to_session(&row)
}

/// Finds a session by its token.
pub async fn find_by_token(pool: &Pool, token: &str) -> Result<Option<Session>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT id, token, user_id, created_at
            FROM sessions
            WHERE token = $1
            "#,
            &[&token],
        )
        .await?;
    row.map(|r| row_to_session(&r)).transpose()
}

/// Deletes the session with the given token, returning the number of rows
/// removed. Deleting an unknown token removes zero rows and is not an error.
pub async fn delete_by_token(pool: &Pool, token: &str) -> Result<u64> {
    let client = pool.get().await?;
    let removed = client
        .execute(
            r#"
            DELETE FROM sessions
            WHERE token = $1
            "#,
            &[&token],
        )
        .await?;
    Ok(removed)
}
