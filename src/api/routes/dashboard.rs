use axum::{extract::State, Extension, Json};
use crate::api::models::DashboardResponse;
use crate::api::AppState;
use crate::errors::ScannerError;
use crate::models::{AuthUser, ScanStats, SortOrder};

pub const DASHBOARD_SCAN_LIMIT: usize = 20;

pub async fn load_dashboard(state: &AppState, user: &AuthUser) -> Result<DashboardResponse, ScannerError> {
    let scans = state
        .store
        .list_by_user(&user.id, DASHBOARD_SCAN_LIMIT, SortOrder::NewestFirst)
        .await?;
    let quota = state.orchestrator.quota_for(&user.id).await?;
    let stats = ScanStats::from_records(&scans);
    Ok(DashboardResponse { scans, quota, stats })
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
) -> Result<Json<DashboardResponse>, ScannerError> {
    let Some(Extension(user)) = user else {
        return Err(ScannerError::Unauthorized("Authentication required".into()));
    };
    Ok(Json(load_dashboard(&state, &user).await?))
}
