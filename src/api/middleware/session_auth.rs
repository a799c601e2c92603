//! Session gate for protected endpoints

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::domain::{AccountId, AuthState};

pub const LOGIN_PATH: &str = "/login";

/// Extractor that admits only callers holding a live session.
///
/// Must come before any body extractor in a handler's argument list so the
/// body of an anonymous request is never read.
#[derive(Debug, Clone, Copy)]
pub struct RequireSession(pub AccountId);

/// Rejection sending anonymous callers to the login page
#[derive(Debug, Clone, Copy)]
pub struct LoginRedirect;

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(LOGIN_PATH).into_response()
    }
}

impl FromRequestParts<AppState> for RequireSession {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_auth_state(&parts.headers, state).await {
            AuthState::Authenticated(account_id) => Ok(RequireSession(account_id)),
            AuthState::Anonymous => {
                debug!(path = %parts.uri.path(), "Anonymous request redirected to login");
                Err(LoginRedirect)
            }
        }
    }
}

/// Resolve the caller's session; store failures count as anonymous
pub async fn resolve_auth_state(headers: &HeaderMap, state: &AppState) -> AuthState {
    let Some(token) = extract_session_token(headers, &state.session.cookie_name) else {
        return AuthState::Anonymous;
    };

    match state.session_store.resolve(&token).await {
        Ok(account_id) => AuthState::from_lookup(account_id),
        Err(e) => {
            warn!(error = %e, "Session lookup failed; treating request as anonymous");
            AuthState::Anonymous
        }
    }
}

/// Session token from the named cookie, falling back to `Authorization: Bearer`
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    })
}
