use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;
use crate::api::errors::not_found;
use crate::api::models::{ScanRequest, ScanResponse};
use crate::api::AppState;
use crate::errors::ScannerError;
use crate::models::{AuthUser, ScanStatus};

pub async fn submit_scan(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    body: Result<Json<ScanRequest>, JsonRejection>,
) -> Result<Response, ScannerError> {
    let Json(req) = body
        .map_err(|e| ScannerError::InvalidInput(format!("Malformed request body: {}", e.body_text())))?;

    let user = user.map(|Extension(u)| u);
    let submission = state.orchestrator.submit_scan(req.url.as_deref(), user.as_ref()).await?;

    if submission.status == ScanStatus::Failed {
        return Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Scan failed", "scanId": submission.scan_id})),
        )
            .into_response());
    }

    let status = match submission.status {
        ScanStatus::Pending => StatusCode::ACCEPTED,
        _ => StatusCode::OK,
    };
    Ok((
        status,
        Json(ScanResponse {
            success: true,
            scan_id: submission.scan_id,
            status: submission.status,
        }),
    )
        .into_response())
}

pub async fn get_scan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ScannerError> {
    match state.store.get(&id).await? {
        Some(record) => Ok(Json(record).into_response()),
        None => Ok(not_found("Scan")),
    }
}
