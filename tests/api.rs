use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use a11y_scanner::api::{build_router, AppState};
use a11y_scanner::auditor::{AuditReport, Auditor, RawFinding};
use a11y_scanner::config::{ExecutionMode, ScannerConfig};
use a11y_scanner::db::Database;
use a11y_scanner::errors::ScannerError;

enum Outcome {
    Report(AuditReport),
    Fail,
}

struct StubAuditor(Outcome);

#[async_trait]
impl Auditor for StubAuditor {
    async fn audit(&self, _url: &str, _timeout: Option<Duration>) -> Result<AuditReport, ScannerError> {
        match &self.0 {
            Outcome::Report(report) => Ok(report.clone()),
            Outcome::Fail => Err(ScannerError::Upstream("PageSpeed API error: 500".into())),
        }
    }

    fn backend_name(&self) -> &str { "stub" }
}

fn finding(id: &str, sub_score: f64) -> RawFinding {
    RawFinding {
        id: id.into(),
        title: format!("{} title", id),
        description: format!("{} description", id),
        impact: None,
        sub_score: Some(sub_score),
        nodes: vec![],
    }
}

fn passing_report() -> AuditReport {
    AuditReport::new(Some(0.75), vec![finding("color-contrast", 0.3), finding("image-alt", 0.8)])
}

fn test_config() -> ScannerConfig {
    let mut config = ScannerConfig::default();
    config.auth.echo_link = true;
    config
}

fn create_test_state_with(outcome: Outcome, config: ScannerConfig) -> AppState {
    let db = Database::in_memory().unwrap();
    AppState::new(db, Arc::new(StubAuditor(outcome)), config)
}

fn create_test_state() -> AppState {
    create_test_state_with(Outcome::Report(passing_report()), test_config())
}

fn app(state: &AppState) -> axum::Router {
    build_router(state.clone())
}

fn make_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    match body {
        Some(b) => builder.body(Body::from(serde_json::to_string(&b).unwrap())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn with_bearer(mut req: Request<Body>, token: &str) -> Request<Body> {
    req.headers_mut()
        .insert(header::AUTHORIZATION, format!("Bearer {}", token).parse().unwrap());
    req
}

async fn response_json(response: Response<Body>) -> Value {
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        panic!("Empty response body. Status: {}, Headers: {:?}", parts.status, parts.headers);
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("JSON parse error: {}. Body: {:?}", e, String::from_utf8_lossy(&bytes)))
}

async fn response_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Run the magic-link flow and return a session token.
async fn sign_in(state: &AppState, email: &str) -> String {
    let req = make_request("POST", "/api/auth/magic-link", Some(json!({"email": email})));
    let body = response_json(app(state).oneshot(req).await.unwrap()).await;
    let link = body["link"].as_str().unwrap().to_string();
    let token = link.split("token=").nth(1).unwrap();

    let req = make_request("GET", &format!("/api/auth/verify?token={}", token), None);
    let body = response_json(app(state).oneshot(req).await.unwrap()).await;
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let state = create_test_state();
    let req = make_request("GET", "/api/health", None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "a11y-scanner");
    assert_eq!(body["backend"], "stub");
    assert_eq!(body["mode"], "synchronous");
    assert_eq!(body["inFlight"], 0);
}

#[tokio::test]
async fn test_submit_and_get_scan() {
    let state = create_test_state();

    let req = make_request("POST", "/scan", Some(json!({"url": "https://example.com"})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "completed");
    let id = body["scanId"].as_str().unwrap().to_string();

    let req = make_request("GET", &format!("/api/scans/{}", id), None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let scan = response_json(response).await;
    assert_eq!(scan["url"], "https://example.com/");
    assert_eq!(scan["score"], 75);
    assert_eq!(scan["violations"].as_array().unwrap().len(), 2);
    assert_eq!(scan["violations"][0]["impact"], "serious");
    assert_eq!(scan["violations"][1]["impact"], "moderate");
    assert!(scan["createdAt"].is_string());
    assert!(scan.get("userId").is_none());
}

#[tokio::test]
async fn test_api_scans_alias() {
    let state = create_test_state();
    let req = make_request("POST", "/api/scans", Some(json!({"url": "http://example.org/page"})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_url_is_rejected_without_record() {
    let state = create_test_state();

    let req = make_request("POST", "/scan", Some(json!({"url": "not-a-url"})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(body["error"].is_string());

    let req = make_request("GET", "/api/results?url=not-a-url", None);
    let body = response_json(app(&state).oneshot(req).await.unwrap()).await;
    assert_eq!(body["found"], false);
}

#[tokio::test]
async fn test_missing_url_and_bad_body() {
    let state = create_test_state();

    let req = make_request("POST", "/scan", Some(json!({})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let req = Request::builder()
        .method("POST")
        .uri("/scan")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_sync_failure_returns_generic_error() {
    let state = create_test_state_with(Outcome::Fail, test_config());

    let req = make_request("POST", "/scan", Some(json!({"url": "https://down.example"})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Scan failed");
    let id = body["scanId"].as_str().unwrap().to_string();

    let req = make_request("GET", &format!("/api/scans/{}", id), None);
    let scan = response_json(app(&state).oneshot(req).await.unwrap()).await;
    assert_eq!(scan["status"], "failed");
    assert!(scan.get("score").is_none());
    assert!(scan.get("violations").is_none());
}

#[tokio::test]
async fn test_get_unknown_scan() {
    let state = create_test_state();
    let req = make_request("GET", "/api/scans/does-not-exist", None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_results_lookup() {
    let state = create_test_state();
    let req = make_request("POST", "/scan", Some(json!({"url": "https://example.com"})));
    let body = response_json(app(&state).oneshot(req).await.unwrap()).await;
    let id = body["scanId"].as_str().unwrap().to_string();

    // Lookup by the un-normalized URL still finds it
    let req = make_request("GET", "/api/results?url=https%3A%2F%2Fexample.com", None);
    let body = response_json(app(&state).oneshot(req).await.unwrap()).await;
    assert_eq!(body["found"], true);
    assert_eq!(body["scan"]["id"], id.as_str());

    let req = make_request("GET", &format!("/api/results?id={}", id), None);
    let body = response_json(app(&state).oneshot(req).await.unwrap()).await;
    assert_eq!(body["found"], true);

    let req = make_request("GET", "/api/results?url=https%3A%2F%2Fnever-scanned.example", None);
    let body = response_json(app(&state).oneshot(req).await.unwrap()).await;
    assert_eq!(body["found"], false);
    assert!(body.get("scan").is_none());

    let req = make_request("GET", "/api/results", None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fire_and_forget_returns_pending() {
    let mut config = test_config();
    config.audit.mode = ExecutionMode::FireAndForget;
    let state = create_test_state_with(Outcome::Report(passing_report()), config);

    let req = make_request("POST", "/scan", Some(json!({"url": "https://example.com"})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = response_json(response).await;
    assert_eq!(body["status"], "pending");
    let id = body["scanId"].as_str().unwrap().to_string();

    state.orchestrator.shutdown(Duration::from_secs(5)).await;

    let req = make_request("GET", &format!("/api/scans/{}", id), None);
    let scan = response_json(app(&state).oneshot(req).await.unwrap()).await;
    assert_ne!(scan["status"], "pending");
}

#[tokio::test]
async fn test_auth_flow_and_dashboard() {
    let state = create_test_state();
    let token = sign_in(&state, "Owner@Example.com").await;

    for _ in 0..2 {
        let req = with_bearer(make_request("POST", "/scan", Some(json!({"url": "https://example.com"}))), &token);
        assert_eq!(app(&state).oneshot(req).await.unwrap().status(), StatusCode::OK);
    }
    // Anonymous scans do not show up on the dashboard
    let req = make_request("POST", "/scan", Some(json!({"url": "https://other.example"})));
    app(&state).oneshot(req).await.unwrap();

    let req = with_bearer(make_request("GET", "/api/dashboard", None), &token);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["scans"].as_array().unwrap().len(), 2);
    assert_eq!(body["quota"]["limit"], 5);
    assert_eq!(body["quota"]["used"], 2);
    assert_eq!(body["quota"]["remaining"], 3);
    assert_eq!(body["stats"]["completed"], 2);
    assert_eq!(body["stats"]["averageScore"], 75);
}

#[tokio::test]
async fn test_verify_sets_cookie_and_token_is_single_use() {
    let state = create_test_state();
    let req = make_request("POST", "/api/auth/magic-link", Some(json!({"email": "a@example.com"})));
    let body = response_json(app(&state).oneshot(req).await.unwrap()).await;
    assert_eq!(body["sent"], true);
    let link = body["link"].as_str().unwrap().to_string();
    let token = link.split("token=").nth(1).unwrap().to_string();

    let req = make_request("GET", &format!("/api/auth/verify?token={}", token), None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap().to_string();
    assert!(cookie.starts_with("a11y_session="));
    assert!(cookie.contains("HttpOnly"));

    let req = make_request("GET", &format!("/api/auth/verify?token={}", token), None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_magic_link_hidden_without_echo() {
    let state = create_test_state_with(Outcome::Report(passing_report()), ScannerConfig::default());
    let req = make_request("POST", "/api/auth/magic-link", Some(json!({"email": "a@example.com"})));
    let body = response_json(app(&state).oneshot(req).await.unwrap()).await;
    assert_eq!(body["sent"], true);
    assert!(body.get("link").is_none());

    let req = make_request("POST", "/api/auth/magic-link", Some(json!({"email": "nope"})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dashboard_requires_auth() {
    let state = create_test_state();
    let req = make_request("GET", "/api/dashboard", None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let req = with_bearer(make_request("GET", "/api/dashboard", None), "bogus-token");
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_quota_exceeded() {
    let mut config = test_config();
    config.quota.monthly_limit = 1;
    let state = create_test_state_with(Outcome::Report(passing_report()), config);
    let token = sign_in(&state, "busy@example.com").await;

    let req = with_bearer(make_request("POST", "/scan", Some(json!({"url": "https://example.com"}))), &token);
    assert_eq!(app(&state).oneshot(req).await.unwrap().status(), StatusCode::OK);

    let req = with_bearer(make_request("POST", "/scan", Some(json!({"url": "https://example.com"}))), &token);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = response_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let state = create_test_state();
    let token = sign_in(&state, "bye@example.com").await;

    let req = with_bearer(make_request("POST", "/api/auth/logout", None), &token);
    let body = response_json(app(&state).oneshot(req).await.unwrap()).await;
    assert_eq!(body["loggedOut"], true);

    let req = with_bearer(make_request("GET", "/api/dashboard", None), &token);
    assert_eq!(app(&state).oneshot(req).await.unwrap().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_home_page() {
    let state = create_test_state();
    let req = make_request("GET", "/", None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = response_text(response).await;
    assert!(html.contains("<form method=\"post\" action=\"/submit\">"));
}

#[tokio::test]
async fn test_dashboard_page_redirects_anonymous() {
    let state = create_test_state();
    let req = make_request("GET", "/dashboard", None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn test_dashboard_page_with_cookie() {
    let state = create_test_state();
    let token = sign_in(&state, "cookie@example.com").await;

    let req = Request::builder()
        .uri("/dashboard")
        .header(header::COOKIE, format!("a11y_session={}", token))
        .body(Body::empty())
        .unwrap();
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = response_text(response).await;
    assert!(html.contains("Tableau de bord"));
    assert!(html.contains("cookie@example.com"));
}

#[tokio::test]
async fn test_stale_cookie_is_anonymous() {
    let state = create_test_state();
    let req = Request::builder()
        .uri("/")
        .header(header::COOKIE, "a11y_session=expired")
        .body(Body::empty())
        .unwrap();
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_form_submission_redirects_to_results() {
    let state = create_test_state();
    let req = Request::builder()
        .method("POST")
        .uri("/submit")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("url=https%3A%2F%2Fexample.com"))
        .unwrap();
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    assert!(location.starts_with("/results?id="));

    let req = make_request("GET", &location, None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = response_text(response).await;
    assert!(html.contains("Résultats de l'analyse"));
    assert!(html.contains(">75<"));
}

#[tokio::test]
async fn test_form_submission_invalid_url() {
    let state = create_test_state();
    let req = Request::builder()
        .method("POST")
        .uri("/submit")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("url=ftp%3A%2F%2Fexample.com"))
        .unwrap();
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = response_text(response).await;
    assert!(html.contains("Adresse invalide"));
}

#[tokio::test]
async fn test_results_page_not_found() {
    let state = create_test_state();
    let req = make_request("GET", "/results?url=https%3A%2F%2Fnothing.example", None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = response_text(response).await;
    assert!(html.contains("Aucun résultat"));
}
