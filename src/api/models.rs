use serde::{Deserialize, Serialize};
use crate::models::{ScanRecord, ScanStats, ScanStatus};
use crate::pipeline::QuotaStatus;

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub success: bool,
    pub scan_id: String,
    pub status: ScanStatus,
}

#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    pub url: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<ScanRecord>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub scans: Vec<ScanRecord>,
    pub quota: QuotaStatus,
    pub stats: ScanStats,
}

#[derive(Debug, Deserialize)]
pub struct MagicLinkRequest {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MagicLinkResponse {
    pub sent: bool,
    /// Only populated when `auth.echo_link` is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub email: String,
}
