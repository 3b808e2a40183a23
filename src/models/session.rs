use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::user::PublicUser;

/// Represents a minted session row.
///
/// `token` is the opaque 64-character hex credential handed to the client.
/// It must never be serialized back out on the session-check path; clients
/// only ever see it once, when the session is issued.
#[derive(Clone, Debug)]
pub struct Session {
    /// The unique identifier for the session.
    pub id: Uuid,
    /// The opaque session token.
    pub token: String,
    /// The ID of the user this session belongs to.
    pub user_id: Uuid,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
}

/// Session metadata exposed to clients. Excludes the raw token.
#[derive(Clone, Debug, Serialize)]
pub struct SessionInfo {
    /// The unique identifier for the session.
    pub id: Uuid,
    /// The ID of the user this session belongs to.
    pub user_id: Uuid,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
}

impl From<&Session> for SessionInfo {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            user_id: session.user_id,
            created_at: session.created_at,
        }
    }
}

/// The identity attached to a request once its token has resolved.
#[derive(Clone, Debug, Serialize)]
pub struct CurrentSession {
    /// The resolved session, minus its token.
    pub session: SessionInfo,
    /// The owning user, minus the password hash.
    pub user: PublicUser,
}
