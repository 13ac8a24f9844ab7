pub mod auth;
pub mod errors;
pub mod models;
pub mod routes;

use std::sync::Arc;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use crate::auditor::{create_auditor, Auditor};
use crate::config::ScannerConfig;
use crate::db::{Database, ScanStore};
use crate::errors::ScannerError;
use crate::pipeline::{OrchestratorSettings, ScanOrchestrator};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub store: Arc<dyn ScanStore>,
    pub orchestrator: ScanOrchestrator,
    pub config: Arc<ScannerConfig>,
}

impl AppState {
    /// Wire state from already-built parts.
    pub fn new(db: Database, auditor: Arc<dyn Auditor>, config: ScannerConfig) -> Self {
        let store: Arc<dyn ScanStore> = Arc::new(db.clone());
        let orchestrator = ScanOrchestrator::new(
            store.clone(),
            auditor,
            OrchestratorSettings::from_config(&config),
        );
        Self {
            db,
            store,
            orchestrator,
            config: Arc::new(config),
        }
    }
}

pub fn create_app_state(config: ScannerConfig) -> Result<AppState, ScannerError> {
    let db = Database::new(&config.server.database)?;
    let auditor = create_auditor(&config)?;
    Ok(AppState::new(db, auditor, config))
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/scan", post(routes::scans::submit_scan))
        .route("/api/scans", post(routes::scans::submit_scan))
        .route("/api/scans/:id", get(routes::scans::get_scan))
        .route("/api/results", get(routes::results::get_results))
        .route("/api/dashboard", get(routes::dashboard::get_dashboard))
        .route("/api/auth/magic-link", post(routes::auth::request_magic_link))
        .route("/api/auth/verify", get(routes::auth::verify_token))
        .route("/api/auth/logout", post(routes::auth::logout));

    let pages = Router::new()
        .route("/", get(routes::pages::home))
        .route("/submit", post(routes::pages::submit_form))
        .route("/results", get(routes::pages::results))
        .route("/dashboard", get(routes::pages::dashboard))
        .route("/login", get(routes::pages::login).post(routes::pages::login_form))
        .route("/auth/callback", get(routes::pages::auth_callback))
        .route("/logout", post(routes::pages::logout_form));

    api.merge(pages)
        .layer(middleware::from_fn_with_state(state.clone(), auth::session_middleware))
        .layer(CatchPanicLayer::custom(errors::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}
