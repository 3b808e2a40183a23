use chrono::{DateTime, Duration, Utc};
use deadpool_postgres::Pool;
use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

use crate::error::Result;
use crate::models::session::{CurrentSession, Session, SessionInfo};
use crate::models::user::PublicUser;
use crate::repositories::session as session_repo;
use crate::repositories::user as user_repo;

/// Raw entropy per token; hex-encodes to 64 characters.
const TOKEN_BYTES: usize = 32;

/// Generates an opaque session token from the OS RNG.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Mints and persists a fresh session for the user.
///
/// Every successful login gets its own token; existing sessions for the same
/// user are left untouched.
pub async fn issue(pool: &Pool, user_id: &Uuid) -> Result<Session> {
    let token = generate_token();
    let session = session_repo::create(pool, &token, user_id).await?;
    tracing::debug!("Session {} issued for user {}", session.id, user_id);
    Ok(session)
}

/// Whether a session created at `created_at` has outlived `max_age_days`
/// as of `now`. A session is valid through the full final day.
pub fn is_expired(created_at: DateTime<Utc>, max_age_days: i64, now: DateTime<Utc>) -> bool {
    now - created_at > Duration::days(max_age_days)
}

/// Resolves a token to its session and owning user.
///
/// Unknown and expired tokens both resolve to `None`; an expired row is
/// deleted on the way out so the table does not accumulate stale sessions.
pub async fn resolve(
    pool: &Pool,
    token: &str,
    max_age_days: i64,
) -> Result<Option<CurrentSession>> {
    let Some(session) = session_repo::find_by_token(pool, token).await? else {
        return Ok(None);
    };

    if is_expired(session.created_at, max_age_days, Utc::now()) {
        tracing::debug!("Session {} expired, removing", session.id);
        session_repo::delete_by_token(pool, token).await?;
        return Ok(None);
    }

    let Some(user) = user_repo::find_by_id(pool, &session.user_id).await? else {
        // The foreign key makes this unreachable unless the store has been
        // modified out-of-band; treat it as an unauthenticated request.
        tracing::warn!(
            "Session {} references missing user {}",
            session.id,
            session.user_id
        );
        return Ok(None);
    };

    Ok(Some(CurrentSession {
        session: SessionInfo::from(&session),
        user: PublicUser::from(&user),
    }))
}

/// Deletes the session for the given token.
///
/// Invalidation is idempotent: a token that no longer matches any session
/// still counts as a successful logout.
pub async fn invalidate(pool: &Pool, token: &str) -> Result<()> {
    let removed = session_repo::delete_by_token(pool, token).await?;
    if removed == 0 {
        tracing::debug!("Logout with no matching session");
    }
    Ok(())
}
