use axum::{extract::State, Json};
use serde_json::{json, Value};
use crate::api::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let settings = state.orchestrator.settings();
    Json(json!({
        "status": "ok",
        "service": "a11y-scanner",
        "version": env!("CARGO_PKG_VERSION"),
        "build": {
            "timestamp": option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
            "git": option_env!("GIT_HASH").unwrap_or("dev"),
        },
        "backend": state.orchestrator.backend_name(),
        "mode": settings.mode.as_str(),
        "scoring": settings.scoring.as_str(),
        "inFlight": state.orchestrator.in_flight_count(),
    }))
}
