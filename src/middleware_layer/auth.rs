use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::{
    models::session::CurrentSession,
    services::session as session_service,
    state::AppState,
};

/// Name of the session cookie set on login and cleared on logout.
pub const SESSION_COOKIE: &str = "SESSION_TOKEN";

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// Pulls the session token from the cookie, falling back to a bearer
/// `Authorization` header for clients that keep the token out of a cookie
/// jar (the mobile shell sends it this way).
pub fn extract_token(cookies: &Cookies, headers: &HeaderMap) -> Option<String> {
    cookies
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| bearer_token(headers))
}

/// Attaches the resolved session to the request.
///
/// Every request through this layer gains an `Option<CurrentSession>`
/// extension. A missing, unknown, or expired token is not an error here; the
/// request simply proceeds with `None`, and each handler decides what that
/// absence means. Store failures during resolution are logged and likewise
/// leave the request unauthenticated.
pub async fn attach_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let mut current: Option<CurrentSession> = None;

    if let Some(token) = extract_token(&cookies, request.headers()) {
        match session_service::resolve(
            &state.db,
            &token,
            state.config.session_duration_days,
        )
        .await
        {
            Ok(Some(resolved)) => {
                tracing::debug!("Request authenticated as user {}", resolved.user.id);
                current = Some(resolved);
            }
            Ok(None) => {
                tracing::debug!("Token did not resolve to an active session");
            }
            Err(e) => {
                tracing::error!("Session resolution failed: {}", e);
            }
        }
    }

    request.extensions_mut().insert(current);

    next.run(request).await
}
