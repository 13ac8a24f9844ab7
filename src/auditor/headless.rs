use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use crate::browser::{BrowserLauncher, SessionGuard};
use crate::errors::ScannerError;
use crate::models::{Impact, ViolationNode, MAX_NODES_PER_VIOLATION, MAX_VIOLATIONS};
use super::provider::Auditor;
use super::types::{AuditReport, RawFinding};

/// Runs axe-core inside a locally launched headless Chromium.
pub struct HeadlessAuditor {
    launcher: Arc<dyn BrowserLauncher>,
    navigation_timeout: Duration,
}

impl HeadlessAuditor {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, navigation_timeout: Duration) -> Self {
        Self { launcher, navigation_timeout }
    }
}

#[async_trait]
impl Auditor for HeadlessAuditor {
    async fn audit(&self, url: &str, _timeout: Option<Duration>) -> Result<AuditReport, ScannerError> {
        let mut guard = SessionGuard::new(self.launcher.launch().await?);

        let result: Result<Value, ScannerError> = async {
            let session = guard.session()?;
            session.navigate(url, self.navigation_timeout).await?;
            debug!(target_url = %url, "Page loaded, running axe");
            session.run_axe().await
        }
        .await;

        guard.release().await;

        let findings = parse_axe_results(&result?)?;
        Ok(AuditReport::new(None, findings))
    }

    fn backend_name(&self) -> &str { "headless" }
}

/// Map an axe-core results object to raw findings.
pub fn parse_axe_results(results: &Value) -> Result<Vec<RawFinding>, ScannerError> {
    let violations = results
        .get("violations")
        .and_then(Value::as_array)
        .ok_or_else(|| ScannerError::Engine("axe results have no violations array".into()))?;

    Ok(violations
        .iter()
        .take(MAX_VIOLATIONS)
        .map(|v| RawFinding {
            id: str_field(v, "id"),
            title: str_field(v, "help"),
            description: str_field(v, "description"),
            impact: v.get("impact").and_then(Value::as_str).and_then(Impact::parse),
            sub_score: None,
            nodes: v
                .get("nodes")
                .and_then(Value::as_array)
                .map(|nodes| nodes.iter().take(MAX_NODES_PER_VIOLATION).map(node).collect())
                .unwrap_or_default(),
        })
        .collect())
}

fn str_field(value: &Value, key: &str) -> String {
    value.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

/// axe reports targets as selector arrays (nested for iframes).
fn node(value: &Value) -> ViolationNode {
    let target = match value.get("target") {
        Some(Value::Array(parts)) => parts
            .iter()
            .map(|p| match p {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" "),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    };
    ViolationNode { html: str_field(value, "html"), target }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::session::fakes::{FakeLauncher, FakeOutcome};
    use serde_json::json;

    fn axe_output() -> Value {
        json!({
            "violations": [
                {
                    "id": "image-alt",
                    "impact": "critical",
                    "description": "Ensures <img> elements have alternate text",
                    "help": "Images must have alternate text",
                    "nodes": [
                        { "html": "<img src=\"a.png\">", "target": ["img.hero"] },
                        { "html": "<img src=\"b.png\">", "target": ["#frame", "img"] },
                        { "html": "<img src=\"c.png\">", "target": ["img.c"] },
                        { "html": "<img src=\"d.png\">", "target": ["img.d"] }
                    ]
                },
                { "id": "color-contrast", "impact": "serious", "description": "Contrast", "help": "Contrast", "nodes": [] },
                { "id": "region", "impact": null, "description": "Landmarks", "help": "Regions", "nodes": [] }
            ]
        })
    }

    #[test]
    fn test_parse_axe_results() {
        let findings = parse_axe_results(&axe_output()).unwrap();
        assert_eq!(findings.len(), 3);
        assert_eq!(findings[0].impact, Some(Impact::Critical));
        assert_eq!(findings[0].title, "Images must have alternate text");
        assert_eq!(findings[0].nodes.len(), 3);
        assert_eq!(findings[0].nodes[1].target, "#frame img");
        assert_eq!(findings[1].impact, Some(Impact::Serious));
        assert_eq!(findings[2].impact, None);
        assert!(findings.iter().all(|f| f.sub_score.is_none()));
    }

    #[test]
    fn test_parse_axe_rejects_missing_violations() {
        assert!(matches!(parse_axe_results(&json!({ "passes": [] })), Err(ScannerError::Engine(_))));
    }

    #[tokio::test]
    async fn test_audit_success_closes_session() {
        let launcher = FakeLauncher::new(FakeOutcome::Axe(axe_output()));
        let auditor = HeadlessAuditor::new(Arc::new(launcher.clone()), Duration::from_secs(30));

        let report = auditor.audit("https://example.com", None).await.unwrap();
        assert_eq!(report.category_score, None);
        assert_eq!(report.findings.len(), 3);
        assert_eq!(launcher.closes(), 1);
        assert_eq!(launcher.navigated.lock().unwrap().as_slice(), ["https://example.com"]);
    }

    #[tokio::test]
    async fn test_navigation_timeout_still_closes_session() {
        let launcher = FakeLauncher::new(FakeOutcome::NavigationTimeout);
        let auditor = HeadlessAuditor::new(Arc::new(launcher.clone()), Duration::from_secs(30));

        let err = auditor.audit("https://slow.example", None).await.unwrap_err();
        assert!(matches!(err, ScannerError::NavigationTimeout(_)));
        assert_eq!(launcher.launches(), 1);
        assert_eq!(launcher.closes(), 1);
    }

    #[tokio::test]
    async fn test_engine_error_still_closes_session() {
        let launcher = FakeLauncher::new(FakeOutcome::EngineError);
        let auditor = HeadlessAuditor::new(Arc::new(launcher.clone()), Duration::from_secs(30));

        let err = auditor.audit("https://example.com", None).await.unwrap_err();
        assert!(matches!(err, ScannerError::Engine(_)));
        assert_eq!(launcher.closes(), 1);
    }

    #[tokio::test]
    async fn test_launch_failure_has_nothing_to_close() {
        let mut launcher = FakeLauncher::new(FakeOutcome::Axe(axe_output()));
        launcher.fail_launch = true;
        let auditor = HeadlessAuditor::new(Arc::new(launcher.clone()), Duration::from_secs(30));

        let err = auditor.audit("https://example.com", None).await.unwrap_err();
        assert!(matches!(err, ScannerError::Launch(_)));
        assert_eq!(launcher.closes(), 0);
    }
}
