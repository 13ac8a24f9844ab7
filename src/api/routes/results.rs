use axum::{
    extract::{Query, State},
    Json,
};
use crate::api::models::{ResultsQuery, ResultsResponse};
use crate::api::AppState;
use crate::errors::ScannerError;
use crate::models::ScanRecord;
use crate::pipeline::normalize_lookup_url;

/// Find a scan by id, or the most recent one for a URL.
pub async fn lookup(state: &AppState, query: &ResultsQuery) -> Result<Option<ScanRecord>, ScannerError> {
    if let Some(id) = query.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        return state.store.get(id).await;
    }
    match query.url.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(url) => state.store.get_latest_by_url(&normalize_lookup_url(url)).await,
        None => Err(ScannerError::InvalidInput("Either url or id is required".into())),
    }
}

pub async fn get_results(
    State(state): State<AppState>,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<ResultsResponse>, ScannerError> {
    let scan = lookup(&state, &query).await?;
    Ok(Json(ResultsResponse { found: scan.is_some(), scan }))
}
