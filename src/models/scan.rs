use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::violation::{Violation, MAX_VIOLATIONS};

/// Lifecycle state of a scan. `Pending` moves exactly once to a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Pending,
    Completed,
    Failed,
}

impl ScanStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ScanStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Pending => "pending",
            ScanStatus::Completed => "completed",
            ScanStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ScanStatus::Pending),
            "completed" => Some(ScanStatus::Completed),
            "failed" => Some(ScanStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted scan. `score` and `violations` are set together, only once completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub id: String,
    pub url: String,
    pub status: ScanStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<Violation>>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl ScanRecord {
    pub fn violation_count(&self) -> usize {
        self.violations.as_ref().map_or(0, |v| v.len())
    }
}

/// The single terminal write applied to a pending scan.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanUpdate {
    Completed { score: u8, violations: Vec<Violation> },
    Failed,
}

impl ScanUpdate {
    /// Build a completed update, clamping the score and truncating overflow violations.
    pub fn completed(score: u8, mut violations: Vec<Violation>) -> Self {
        violations.truncate(MAX_VIOLATIONS);
        ScanUpdate::Completed { score: score.min(100), violations }
    }

    pub fn status(&self) -> ScanStatus {
        match self {
            ScanUpdate::Completed { .. } => ScanStatus::Completed,
            ScanUpdate::Failed => ScanStatus::Failed,
        }
    }
}

/// Ordering for listing scans by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}
