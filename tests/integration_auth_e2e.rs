//! End-to-end exercises for the /auth surface.
//!
//! These run against a live server and database:
//!
//!   DATABASE_URL=postgres://... cargo run
//!   cargo test -- --ignored
//!
//! Usernames are timestamped so repeated runs do not collide.

use once_cell::sync::Lazy;
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};

static BASE_URL: Lazy<String> = Lazy::new(|| {
    std::env::var("AUTH_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string())
});

// Shared test context
struct TestContext {
    client: reqwest::Client,
    base_url: String,
}

impl TestContext {
    fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .unwrap(),
            base_url: BASE_URL.clone(),
        }
    }

    fn get_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/auth/register", self.base_url))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap()
    }

    async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/auth/login", self.base_url))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[tokio::test]
    #[ignore]
    async fn test_register_login_check_logout_roundtrip() {
        let context = TestContext::new();
        let username = format!("alice_{}", TestContext::get_timestamp());

        let reg = context.register(&username, "secret1").await;
        assert_eq!(reg.status(), 201);
        let reg_body: Value = reg.json().await.unwrap();
        assert_eq!(reg_body["success"], true);
        assert_eq!(reg_body["user"]["username"], username.as_str());
        assert!(reg_body["user"].get("password").is_none());

        // Login with a case-variant of the registered username.
        let login = context.login(&username.to_uppercase(), "secret1").await;
        assert_eq!(login.status(), 200);
        let login_body: Value = login.json().await.unwrap();
        let token = login_body["data"]["token"].as_str().unwrap().to_string();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

        // The cookie jar now holds SESSION_TOKEN; the check endpoint should
        // see us, and must not echo the token or the password hash.
        let check = context
            .client
            .get(format!("{}/auth", context.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(check.status(), 200);
        let check_body: Value = check.json().await.unwrap();
        assert_eq!(check_body["success"], true);
        assert_eq!(check_body["data"]["user"]["username"], username.as_str());
        assert!(check_body["data"]["user"].get("password").is_none());
        assert!(check_body["data"]["session"].get("token").is_none());

        let logout = context
            .client
            .post(format!("{}/auth/logout", context.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(logout.status(), 200);

        let check_after: Value = context
            .client
            .get(format!("{}/auth", context.base_url))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(check_after["success"], false);
    }

    #[tokio::test]
    #[ignore]
    async fn test_duplicate_registration_conflicts() {
        let context = TestContext::new();
        let username = format!("bob_{}", TestContext::get_timestamp());

        assert_eq!(context.register(&username, "secret1").await.status(), 201);
        assert_eq!(context.register(&username, "secret1").await.status(), 409);

        // A case-variant of a taken name conflicts too.
        assert_eq!(
            context
                .register(&username.to_uppercase(), "secret1")
                .await
                .status(),
            409
        );
    }

    #[tokio::test]
    #[ignore]
    async fn test_failed_logins_do_not_reveal_which_field_was_wrong() {
        let context = TestContext::new();
        let username = format!("carol_{}", TestContext::get_timestamp());
        assert_eq!(context.register(&username, "secret1").await.status(), 201);

        let wrong_password = context.login(&username, "wrong").await;
        assert_eq!(wrong_password.status(), 401);
        let wrong_password_body: Value = wrong_password.json().await.unwrap();

        let unknown_user = context.login("no_such_user_ever", "secret1").await;
        assert_eq!(unknown_user.status(), 401);
        let unknown_user_body: Value = unknown_user.json().await.unwrap();

        assert_eq!(wrong_password_body["message"], unknown_user_body["message"]);
    }

    #[tokio::test]
    #[ignore]
    async fn test_each_login_mints_a_distinct_token() {
        let context = TestContext::new();
        let username = format!("dave_{}", TestContext::get_timestamp());
        assert_eq!(context.register(&username, "secret1").await.status(), 201);

        let first: Value = context.login(&username, "secret1").await.json().await.unwrap();
        let second: Value = context.login(&username, "secret1").await.json().await.unwrap();
        assert_ne!(first["data"]["token"], second["data"]["token"]);
    }

    #[tokio::test]
    #[ignore]
    async fn test_logout_is_idempotent_and_requires_a_token() {
        let context = TestContext::new();
        let username = format!("erin_{}", TestContext::get_timestamp());
        assert_eq!(context.register(&username, "secret1").await.status(), 201);

        let login_body: Value = context.login(&username, "secret1").await.json().await.unwrap();
        let token = login_body["data"]["token"].as_str().unwrap().to_string();

        // A bare client with no cookie and no header gets a 400.
        let bare = reqwest::Client::new();
        let no_token = bare
            .post(format!("{}/auth/logout", &*BASE_URL))
            .send()
            .await
            .unwrap();
        assert_eq!(no_token.status(), 400);

        // Logout twice with the same bearer token; the second is a no-op
        // but still succeeds.
        for _ in 0..2 {
            let logout = bare
                .post(format!("{}/auth/logout", &*BASE_URL))
                .header("Authorization", format!("Bearer {}", token))
                .send()
                .await
                .unwrap();
            assert_eq!(logout.status(), 200);
        }

        // The invalidated token no longer resolves.
        let check: Value = bare
            .get(format!("{}/auth", &*BASE_URL))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(check["success"], false);
    }

    #[tokio::test]
    #[ignore]
    async fn test_missing_fields_are_rejected() {
        let context = TestContext::new();

        let login = context.login("", "").await;
        assert_eq!(login.status(), 400);

        let register = context.register("", "secret1").await;
        assert_eq!(register.status(), 400);
    }
}
