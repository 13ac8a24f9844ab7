use crate::config::ScoreStrategy;
use crate::errors::ScannerError;
use crate::models::Violation;

/// Compute the 0-100 score stored on a completed scan.
pub fn compute_score(
    strategy: ScoreStrategy,
    category_score: Option<f64>,
    violations: &[Violation],
) -> Result<u8, ScannerError> {
    match strategy {
        ScoreStrategy::Direct => {
            let score = category_score.ok_or_else(|| {
                ScannerError::Engine("Audit engine reported no category score".into())
            })?;
            Ok((score.clamp(0.0, 1.0) * 100.0).round() as u8)
        }
        ScoreStrategy::Weighted => {
            let penalty: u32 = violations.iter().map(|v| v.impact.penalty()).sum();
            Ok(100u32.saturating_sub(penalty) as u8)
        }
    }
}
