use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use tracing::warn;
use crate::api::auth::{clear_session_cookie, issue_magic_link, presented_session, redeem_login_token, session_cookie};
use crate::api::models::{ResultsQuery, ScanRequest, VerifyQuery};
use crate::api::routes::dashboard::load_dashboard;
use crate::api::routes::results::lookup;
use crate::api::AppState;
use crate::errors::ScannerError;
use crate::models::AuthUser;
use crate::views::{self, encode_query, LoginNotice};

type MaybeUser = Option<Extension<AuthUser>>;

fn user_ref(user: &MaybeUser) -> Option<&AuthUser> {
    user.as_ref().map(|Extension(u)| u)
}

pub async fn home(user: MaybeUser) -> Html<String> {
    Html(views::render_home(user_ref(&user), None, ""))
}

/// HTML form submission; lands on the results page in either execution mode.
pub async fn submit_form(
    State(state): State<AppState>,
    user: MaybeUser,
    Form(form): Form<ScanRequest>,
) -> Response {
    match state.orchestrator.submit_scan(form.url.as_deref(), user_ref(&user)).await {
        Ok(submission) => Redirect::to(&format!("/results?id={}", encode_query(&submission.scan_id))).into_response(),
        Err(e) => {
            let message = match &e {
                ScannerError::InvalidInput(_) => "Adresse invalide : saisissez une URL complète commençant par http:// ou https://",
                ScannerError::QuotaExceeded(_) => "Vous avez atteint votre limite mensuelle d'analyses.",
                _ => {
                    warn!(error = %e, "Form submission failed");
                    "L'analyse n'a pas pu être lancée. Réessayez dans quelques instants."
                }
            };
            let html = views::render_home(user_ref(&user), Some(message), form.url.as_deref().unwrap_or_default());
            (e.into_response().status(), Html(html)).into_response()
        }
    }
}

pub async fn results(
    State(state): State<AppState>,
    user: MaybeUser,
    Query(query): Query<ResultsQuery>,
) -> Response {
    let label = query.id.clone().or_else(|| query.url.clone()).unwrap_or_default();
    match lookup(&state, &query).await {
        Ok(record) => Html(views::render_results(record.as_ref(), &label, user_ref(&user))).into_response(),
        Err(ScannerError::InvalidInput(_)) => Redirect::to("/").into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn dashboard(State(state): State<AppState>, user: MaybeUser) -> Response {
    let Some(Extension(user)) = user else {
        return Redirect::to("/login").into_response();
    };
    match load_dashboard(&state, &user).await {
        Ok(data) => Html(views::render_dashboard(&user, &data.scans, &data.quota, &data.stats)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn login(user: MaybeUser) -> Response {
    if user.is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    Html(views::render_login(None)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
}

pub async fn login_form(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match issue_magic_link(&state, form.email.as_deref()) {
        Ok(link) => {
            let email = form.email.as_deref().unwrap_or_default().trim();
            let dev_link = state.config.auth.echo_link.then_some(link.as_str());
            Html(views::render_login(Some(LoginNotice::LinkSent { email, dev_link }))).into_response()
        }
        Err(ScannerError::InvalidInput(_)) => {
            Html(views::render_login(Some(LoginNotice::Error("Adresse e-mail invalide.")))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn auth_callback(State(state): State<AppState>, Query(query): Query<VerifyQuery>) -> Response {
    match redeem_login_token(&state, query.token.as_deref()) {
        Ok((token, _user)) => (
            [(header::SET_COOKIE, session_cookie(&token, state.config.auth.session_ttl_days))],
            Redirect::to("/dashboard"),
        )
            .into_response(),
        Err(ScannerError::InvalidInput(_)) | Err(ScannerError::Unauthorized(_)) => Html(views::render_login(Some(
            LoginNotice::Error("Ce lien de connexion est invalide ou a expiré."),
        )))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn logout_form(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = presented_session(&headers) {
        if let Err(e) = state.db.delete_session(&token) {
            warn!(error = %e, "Failed to revoke session");
        }
    }
    ([(header::SET_COOKIE, clear_session_cookie())], Redirect::to("/")).into_response()
}
