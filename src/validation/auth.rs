use crate::error::{AppError, Result};

/// Login's missing-field message.
pub const MISSING_LOGIN_FIELDS: &str = "Missing username/password.";
/// Registration's missing-field message.
pub const MISSING_REGISTER_FIELDS: &str = "Username and password are required.";

/// Validates the credential pair shared by login and registration.
///
/// Both endpoints require a non-empty username and password; no further
/// shape is imposed on either field. The two endpoints report the absence
/// with different wording, so the message comes from the caller.
pub fn validate_credentials(username: &str, password: &str, missing_message: &str) -> Result<()> {
    if username.is_empty() || password.is_empty() {
        return Err(AppError::Validation(missing_message.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_non_empty_credentials() {
        assert!(validate_credentials("alice", "secret1", MISSING_LOGIN_FIELDS).is_ok());
    }

    #[test]
    fn rejects_empty_username() {
        assert!(validate_credentials("", "secret1", MISSING_LOGIN_FIELDS).is_err());
    }

    #[test]
    fn rejects_empty_password() {
        assert!(validate_credentials("alice", "", MISSING_REGISTER_FIELDS).is_err());
    }

    #[test]
    fn reports_the_message_for_the_endpoint() {
        let err = validate_credentials("", "", MISSING_LOGIN_FIELDS).unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, MISSING_LOGIN_FIELDS),
            other => panic!("expected a validation error, got {other:?}"),
        }
    }
}
