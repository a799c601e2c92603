//! Authentication API endpoints
//!
//! Registration, login, logout and the current-account lookup. A successful
//! login creates a server-side session and hands its token back as an
//! HttpOnly cookie (and in the body for non-browser clients).

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::middleware::{extract_session_token, RequireSession};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::config::SessionConfig;
use crate::domain::Account;
use crate::infrastructure::account::RegisterAccountRequest;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(get_current_account))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub account: AccountResponse,
    pub expires_in: u64,
}

/// Account fields safe to expose
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id().value(),
            username: account.username().to_string(),
            email: account.email().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginHint {
    pub message: String,
    pub login: String,
    pub register: String,
}

/// GET /login
///
/// Landing point for callers the session gate turned away.
pub async fn login_hint() -> Json<LoginHint> {
    Json(LoginHint {
        message: "Authentication required".to_string(),
        login: "POST /auth/login".to_string(),
        register: "POST /auth/register".to_string(),
    })
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .account_service
        .register(RegisterAccountRequest {
            username: request.username,
            email: request.email,
            password: request.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(&account))))
}

/// POST /auth/login
///
/// Unknown email and wrong password get the same answer.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .account_service
        .authenticate(&request.email, &request.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let token = state.session_store.create(account.id()).await?;
    let cookie = session_cookie(&state.session, token.as_str())?;

    info!(account_id = %account.id(), "Account logged in");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            token: token.into_inner(),
            account: AccountResponse::from(&account),
            expires_in: state.session.ttl_secs,
        }),
    ))
}

/// POST /auth/logout
///
/// Always succeeds; a missing or unknown session is already logged out.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = extract_session_token(&headers, &state.session.cookie_name) {
        if let Err(e) = state.session_store.clear(&token).await {
            warn!(error = %e, "Failed to clear session");
        }
    }

    Ok((
        [(header::SET_COOKIE, expired_cookie(&state.session)?)],
        Json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }),
    ))
}

/// GET /auth/me
pub async fn get_current_account(
    RequireSession(account_id): RequireSession,
    State(state): State<AppState>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .account_service
        .get(account_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Account not found"))?;

    Ok(Json(AccountResponse::from(&account)))
}

fn session_cookie(config: &SessionConfig, token: &str) -> Result<HeaderValue, ApiError> {
    build_cookie(config, token, config.ttl_secs)
}

fn expired_cookie(config: &SessionConfig) -> Result<HeaderValue, ApiError> {
    build_cookie(config, "", 0)
}

fn build_cookie(config: &SessionConfig, value: &str, max_age: u64) -> Result<HeaderValue, ApiError> {
    let secure = if config.secure_cookie { "; Secure" } else { "" };
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        config.cookie_name, value, max_age, secure
    );

    HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::internal(format!("Invalid session cookie: {}", e)))
}
