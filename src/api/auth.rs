use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Duration;
use tracing::{debug, info, warn};
use crate::api::AppState;
use crate::errors::ScannerError;
use crate::models::AuthUser;

pub const SESSION_COOKIE: &str = "a11y_session";

/// Resolve the caller from a Bearer token or the session cookie.
///
/// A Bearer token that does not resolve is rejected with 401. A stale cookie is
/// ignored so browsers with an expired session still see public pages.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match state.db.get_session_user(&token) {
            Ok(Some(user)) => {
                request.extensions_mut().insert(user);
            }
            Ok(None) => {
                return ScannerError::Unauthorized("Invalid or expired session token".into()).into_response();
            }
            Err(e) => return e.into_response(),
        }
    } else if let Some(token) = cookie_value(request.headers(), SESSION_COOKIE) {
        match state.db.get_session_user(&token) {
            Ok(Some(user)) => {
                request.extensions_mut().insert(user);
            }
            Ok(None) => debug!("Ignoring expired session cookie"),
            Err(e) => warn!(error = %e, "Session lookup failed, continuing anonymously"),
        }
    }

    next.run(request).await
}

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The session token a request presented, from either source.
pub fn presented_session(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).or_else(|| cookie_value(headers, SESSION_COOKIE))
}

pub fn session_cookie(token: &str, ttl_days: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        ttl_days.max(0) * 24 * 60 * 60
    )
}

pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

fn validate_email(raw: Option<&str>) -> Result<String, ScannerError> {
    let email = raw.map(str::trim).unwrap_or_default();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'))
        && !email.chars().any(char::is_whitespace);
    if valid {
        Ok(email.to_lowercase())
    } else {
        Err(ScannerError::InvalidInput("A valid email address is required".into()))
    }
}

/// Create a single-use login link for `email`. Delivery is external; the link is logged.
pub fn issue_magic_link(state: &AppState, raw_email: Option<&str>) -> Result<String, ScannerError> {
    let email = validate_email(raw_email)?;
    let user = state.db.upsert_user(&email)?;
    let ttl = Duration::minutes(state.config.auth.login_token_ttl_minutes);
    let token = state.db.create_login_token(&user.id, ttl)?;

    let link = format!(
        "{}/auth/callback?token={}",
        state.config.auth.public_base_url.trim_end_matches('/'),
        token
    );
    info!(email = %user.email, %link, "Magic link issued");
    Ok(link)
}

/// Exchange a login token for a new session token.
pub fn redeem_login_token(state: &AppState, token: Option<&str>) -> Result<(String, AuthUser), ScannerError> {
    let token = token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ScannerError::InvalidInput("Login token is required".into()))?;

    let user = state
        .db
        .consume_login_token(token)?
        .ok_or_else(|| ScannerError::Unauthorized("Invalid or expired login link".into()))?;

    let session = state
        .db
        .create_session(&user.id, Duration::days(state.config.auth.session_ttl_days))?;
    info!(user_id = %user.id, "Session created");
    Ok((session, user))
}
