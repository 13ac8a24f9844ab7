use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use crate::api::auth::{clear_session_cookie, issue_magic_link, presented_session, redeem_login_token, session_cookie};
use crate::api::models::{MagicLinkRequest, MagicLinkResponse, SessionResponse, VerifyQuery};
use crate::api::AppState;
use crate::errors::ScannerError;

pub async fn request_magic_link(
    State(state): State<AppState>,
    body: Result<Json<MagicLinkRequest>, JsonRejection>,
) -> Result<Json<MagicLinkResponse>, ScannerError> {
    let Json(req) = body
        .map_err(|e| ScannerError::InvalidInput(format!("Malformed request body: {}", e.body_text())))?;
    let link = issue_magic_link(&state, req.email.as_deref())?;
    Ok(Json(MagicLinkResponse {
        sent: true,
        link: state.config.auth.echo_link.then_some(link),
    }))
}

pub async fn verify_token(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<Response, ScannerError> {
    let (token, user) = redeem_login_token(&state, query.token.as_deref())?;
    let cookie = session_cookie(&token, state.config.auth.session_ttl_days);
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(SessionResponse { token, email: user.email }),
    )
        .into_response())
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ScannerError> {
    let revoked = match presented_session(&headers) {
        Some(token) => state.db.delete_session(&token)?,
        None => false,
    };
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(json!({"loggedOut": revoked})),
    )
        .into_response())
}
