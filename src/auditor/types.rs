use crate::models::{Impact, ViolationNode, MAX_VIOLATIONS};

/// A rule failure as reported by an audit backend, before translation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFinding {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Impact category when the engine reports one directly.
    pub impact: Option<Impact>,
    /// Continuous 0..1 score when the engine reports one instead.
    pub sub_score: Option<f64>,
    pub nodes: Vec<ViolationNode>,
}

/// Normalized output of one audit run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditReport {
    /// Aggregate 0..1 accessibility score, if the engine computes one.
    pub category_score: Option<f64>,
    pub findings: Vec<RawFinding>,
}

impl AuditReport {
    pub fn new(category_score: Option<f64>, mut findings: Vec<RawFinding>) -> Self {
        findings.truncate(MAX_VIOLATIONS);
        Self { category_score, findings }
    }
}
