use serde::Serialize;
use super::scan::{ScanRecord, ScanStatus};

/// Aggregate counts over a list of scans.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub pending: usize,
    /// Rounded mean score of completed scans.
    pub average_score: Option<u8>,
}

impl ScanStats {
    pub fn from_records(records: &[ScanRecord]) -> Self {
        let mut stats = ScanStats { total: records.len(), ..Default::default() };
        let mut score_sum = 0u32;
        let mut scored = 0u32;

        for record in records {
            match record.status {
                ScanStatus::Completed => {
                    stats.completed += 1;
                    if let Some(score) = record.score {
                        score_sum += u32::from(score);
                        scored += 1;
                    }
                }
                ScanStatus::Failed => stats.failed += 1,
                ScanStatus::Pending => stats.pending += 1,
            }
        }

        if scored > 0 {
            stats.average_score = Some((score_sum as f64 / scored as f64).round() as u8);
        }
        stats
    }
}
