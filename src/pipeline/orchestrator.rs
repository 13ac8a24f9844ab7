use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use chrono::Utc;
use dashmap::DashMap;
use futures::FutureExt;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn, Instrument};
use crate::auditor::Auditor;
use crate::config::{ExecutionMode, QuotaConfig, ScannerConfig, ScoreStrategy};
use crate::db::ScanStore;
use crate::errors::ScannerError;
use crate::models::{AuthUser, ScanStatus, ScanUpdate};
use super::normalize::normalize_findings;
use super::quota::{month_start, QuotaStatus};
use super::scoring::compute_score;
use super::validation::validate_scan_url;

/// Deployment-wide knobs that shape how scans run.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub mode: ExecutionMode,
    pub scoring: ScoreStrategy,
    /// Deadline for a whole audit call. `None` leaves it to the backend.
    pub timeout: Option<Duration>,
    pub quota: QuotaConfig,
}

impl OrchestratorSettings {
    pub fn from_config(config: &ScannerConfig) -> Self {
        Self {
            mode: config.audit.mode,
            scoring: config.audit.score_strategy(),
            timeout: config.audit.timeout(),
            quota: config.quota.clone(),
        }
    }
}

/// Result of accepting a scan request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSubmission {
    pub scan_id: String,
    /// Terminal status in synchronous mode, `pending` in fire-and-forget mode.
    pub status: ScanStatus,
}

/// Drives a scan from submission to its single terminal write.
///
/// Every audit runs on a task owned by the orchestrator's tracker, so a client
/// that disconnects mid-request never leaves a record stuck in `pending`.
#[derive(Clone)]
pub struct ScanOrchestrator {
    store: Arc<dyn ScanStore>,
    auditor: Arc<dyn Auditor>,
    settings: Arc<OrchestratorSettings>,
    in_flight: Arc<DashMap<String, CancellationToken>>,
    shutdown: CancellationToken,
    tracker: TaskTracker,
    /// Held across the quota count and the insert that consumes it.
    quota_gate: Arc<tokio::sync::Mutex<()>>,
}

impl ScanOrchestrator {
    pub fn new(
        store: Arc<dyn ScanStore>,
        auditor: Arc<dyn Auditor>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            store,
            auditor,
            settings: Arc::new(settings),
            in_flight: Arc::new(DashMap::new()),
            shutdown: CancellationToken::new(),
            tracker: TaskTracker::new(),
            quota_gate: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    pub fn backend_name(&self) -> &str {
        self.auditor.backend_name()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Validate, gate on quota, create the pending record and run the audit.
    pub async fn submit_scan(
        &self,
        raw_url: Option<&str>,
        user: Option<&AuthUser>,
    ) -> Result<ScanSubmission, ScannerError> {
        let url = validate_scan_url(raw_url)?;

        if self.shutdown.is_cancelled() {
            return Err(ScannerError::Cancelled("Service is shutting down".into()));
        }

        let record = match user {
            Some(user) if self.settings.quota.enforce => {
                let _gate = self.quota_gate.lock().await;
                self.check_quota(&user.id).await?;
                self.store.create(url.as_str(), Some(&user.id)).await?
            }
            _ => self.store.create(url.as_str(), user.map(|u| u.id.as_str())).await?,
        };
        info!(scan_id = %record.id, url = %record.url, mode = self.settings.mode.as_str(), "Scan created");

        let token = self.shutdown.child_token();
        self.in_flight.insert(record.id.clone(), token.clone());

        let span = tracing::info_span!("scan", scan_id = %record.id);
        let this = self.clone();
        let scan_id = record.id.clone();
        let url = record.url.clone();
        let handle = self.tracker.spawn(
            async move { this.run_to_completion(&scan_id, &url, token).await }.instrument(span),
        );

        match self.settings.mode {
            ExecutionMode::FireAndForget => Ok(ScanSubmission {
                scan_id: record.id,
                status: ScanStatus::Pending,
            }),
            ExecutionMode::Synchronous => {
                let status = handle.await.unwrap_or_else(|e| {
                    error!(scan_id = %record.id, error = %e, "Scan task aborted");
                    ScanStatus::Failed
                });
                Ok(ScanSubmission { scan_id: record.id, status })
            }
        }
    }

    /// Current monthly usage for a user.
    pub async fn quota_for(&self, user_id: &str) -> Result<QuotaStatus, ScannerError> {
        let used = self.store.count_since(user_id, month_start(Utc::now())).await?;
        Ok(QuotaStatus::new(self.settings.quota.monthly_limit, used))
    }

    async fn check_quota(&self, user_id: &str) -> Result<(), ScannerError> {
        let quota = self.quota_for(user_id).await?;
        if quota.is_exhausted() {
            return Err(ScannerError::QuotaExceeded(format!(
                "Monthly limit of {} scans reached",
                quota.limit
            )));
        }
        Ok(())
    }

    async fn run_to_completion(&self, scan_id: &str, url: &str, cancel: CancellationToken) -> ScanStatus {
        let started = Instant::now();
        let outcome = AssertUnwindSafe(self.run_audit(url, &cancel)).catch_unwind().await;
        self.in_flight.remove(scan_id);
        let duration_ms = started.elapsed().as_millis() as u64;

        let update = match outcome {
            Ok(Ok(update)) => update,
            Ok(Err(e)) => {
                let class = e.classify();
                warn!(error_type = class.error_type, error = %e, duration_ms, "Audit failed");
                ScanUpdate::Failed
            }
            Err(_) => {
                error!(duration_ms, "Audit task panicked");
                ScanUpdate::Failed
            }
        };

        let status = self.persist(scan_id, update).await;
        info!(status = status.as_str(), duration_ms, "Scan finished");
        status
    }

    async fn run_audit(&self, url: &str, cancel: &CancellationToken) -> Result<ScanUpdate, ScannerError> {
        let audit = self.auditor.audit(url, self.settings.timeout);
        let bounded = async {
            match self.settings.timeout {
                Some(limit) => match tokio::time::timeout(limit, audit).await {
                    Ok(result) => result,
                    Err(_) => Err(ScannerError::Timeout(format!("Audit exceeded {:?}", limit))),
                },
                None => audit.await,
            }
        };

        let report = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(ScannerError::Cancelled("Scan cancelled before the audit finished".into()));
            }
            report = bounded => report?,
        };

        let violations = normalize_findings(report.findings);
        let score = compute_score(self.settings.scoring, report.category_score, &violations)?;
        Ok(ScanUpdate::completed(score, violations))
    }

    /// Apply the terminal write. A failed `Completed` write degrades to `Failed`;
    /// a failed `Failed` write is only logged.
    async fn persist(&self, scan_id: &str, update: ScanUpdate) -> ScanStatus {
        let status = update.status();
        match self.store.update(scan_id, update).await {
            Ok(true) => status,
            Ok(false) => {
                warn!("Scan was already terminal, update skipped");
                match self.store.get(scan_id).await {
                    Ok(Some(record)) => record.status,
                    _ => status,
                }
            }
            Err(e) if status == ScanStatus::Completed => {
                error!(error = %e, "Failed to store completed scan, marking failed");
                if let Err(e) = self.store.update(scan_id, ScanUpdate::Failed).await {
                    error!(error = %e, "Failed to mark scan failed");
                }
                ScanStatus::Failed
            }
            Err(e) => {
                error!(error = %e, "Failed to mark scan failed");
                ScanStatus::Failed
            }
        }
    }

    /// Stop accepting scans and signal every in-flight audit to abort.
    pub fn cancel_all(&self) {
        if self.shutdown.is_cancelled() {
            return;
        }
        let pending = self.in_flight_count();
        if pending > 0 {
            info!(in_flight = pending, "Cancelling in-flight scans");
        }
        self.shutdown.cancel();
        self.tracker.close();
    }

    /// Cancel every in-flight audit and wait for their terminal writes.
    pub async fn shutdown(&self, grace: Duration) {
        self.cancel_all();
        if tokio::time::timeout(grace, self.tracker.wait()).await.is_err() {
            warn!(in_flight = self.in_flight_count(), "Shutdown grace period elapsed");
        }
    }
}
