use deadpool_postgres::Pool;
use zeroize::Zeroize;

use crate::error::{AppError, Result};
use crate::models::user::User;
use crate::repositories::user as user_repo;

/// The bcrypt work factor applied to new password hashes.
const BCRYPT_COST: u32 = 10;

/// Hashes a password with bcrypt.
///
/// The plaintext buffer is wiped once the hash has been computed.
pub fn hash_password(password: &str) -> Result<String> {
    let mut password_bytes = password.as_bytes().to_vec();
    let hash = bcrypt::hash(password_bytes.as_slice(), BCRYPT_COST)?;
    password_bytes.zeroize();
    tracing::debug!("Password hashed with bcrypt (cost {})", BCRYPT_COST);
    Ok(hash)
}

/// Verifies a password against a stored bcrypt hash.
///
/// Returns `Ok(false)` for a wrong password; errors only when the stored
/// hash itself cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let mut password_bytes = password.as_bytes().to_vec();
    let result = bcrypt::verify(password_bytes.as_slice(), hash)?;
    password_bytes.zeroize();
    Ok(result)
}

/// Registers a new user with a hashed password.
pub async fn register(pool: &Pool, username: &str, password: &str) -> Result<User> {
    let hashed_password = hash_password(password)?;
    let user = user_repo::create(pool, username, &hashed_password).await?;
    tracing::info!("User registered: {}", user.id);
    Ok(user)
}

/// Authenticates a user by username and password.
///
/// The username lookup is case-insensitive. An unknown username and a wrong
/// password produce the same `InvalidCredentials` error, so the response
/// never reveals which of the two failed.
pub async fn authenticate(pool: &Pool, username: &str, password: &str) -> Result<User> {
    let user = user_repo::find_by_username(pool, username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(password, &user.password)? {
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!("User authenticated: {}", user.id);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("secret2", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("secret1").unwrap();
        let second = hash_password("secret1").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_stored_hash_is_an_error_not_a_mismatch() {
        assert!(verify_password("secret1", "not-a-bcrypt-hash").is_err());
    }
}
