use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Represents a registered account.
///
/// The `password` field holds the bcrypt hash, never the plaintext. It is
/// deliberately absent from [`PublicUser`], which is the only shape that
/// leaves the process.
#[derive(Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's username.
    pub username: String,
    /// The bcrypt hash of the user's password.
    pub password: String,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}

/// The client-facing view of a user.
#[derive(Clone, Debug, Serialize)]
pub struct PublicUser {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's username.
    pub username: String,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            created_at: user.created_at,
        }
    }
}
