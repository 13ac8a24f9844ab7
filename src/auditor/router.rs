use std::sync::Arc;
use crate::browser::NodeLauncher;
use crate::config::{AuditBackend, ScannerConfig};
use crate::errors::ScannerError;
use super::headless::HeadlessAuditor;
use super::pagespeed::PageSpeedAuditor;
use super::provider::Auditor;

/// Build the auditor selected by `audit.backend`.
pub fn create_auditor(config: &ScannerConfig) -> Result<Arc<dyn Auditor>, ScannerError> {
    match config.audit.backend {
        AuditBackend::Remote => Ok(Arc::new(PageSpeedAuditor::new(&config.remote)?)),
        AuditBackend::Headless => {
            let launcher = NodeLauncher::new(&config.browser)?;
            Ok(Arc::new(HeadlessAuditor::new(
                Arc::new(launcher),
                config.browser.navigation_timeout(),
            )))
        }
    }
}
