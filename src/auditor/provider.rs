use std::time::Duration;
use async_trait::async_trait;
use crate::errors::ScannerError;
use super::types::AuditReport;

/// Runs an accessibility check against a URL and returns its rule violations.
#[async_trait]
pub trait Auditor: Send + Sync {
    /// Audit `url`. `timeout` bounds outbound work the backend controls directly;
    /// implementations never return more than 20 findings.
    async fn audit(&self, url: &str, timeout: Option<Duration>) -> Result<AuditReport, ScannerError>;

    /// Backend name for logging
    fn backend_name(&self) -> &str;
}
