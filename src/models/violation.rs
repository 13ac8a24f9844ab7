use serde::{Deserialize, Serialize};

/// Upper bound on violations stored for a single scan.
pub const MAX_VIOLATIONS: usize = 20;

/// Upper bound on DOM excerpts kept per violation.
pub const MAX_NODES_PER_VIOLATION: usize = 3;

/// Sub-scores below this value are bucketed as `serious`.
const SERIOUS_SUB_SCORE_THRESHOLD: f64 = 0.5;

/// Severity of an accessibility violation, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Minor,
    Moderate,
    Serious,
    Critical,
}

impl Impact {
    /// Points deducted from 100 under the weighted scoring strategy.
    pub fn penalty(&self) -> u32 {
        match self {
            Impact::Critical => 20,
            Impact::Serious => 10,
            Impact::Moderate => 5,
            Impact::Minor => 2,
        }
    }

    /// Coarse two-bucket mapping for engines that report a continuous 0..1 sub-score.
    pub fn from_sub_score(score: f64) -> Self {
        if score < SERIOUS_SUB_SCORE_THRESHOLD {
            Impact::Serious
        } else {
            Impact::Moderate
        }
    }

    /// Resolve the impact of a finding: explicit impact first, then sub-score, else minor.
    pub fn resolve(explicit: Option<Impact>, sub_score: Option<f64>) -> Self {
        explicit
            .or_else(|| sub_score.map(Impact::from_sub_score))
            .unwrap_or(Impact::Minor)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minor" => Some(Impact::Minor),
            "moderate" => Some(Impact::Moderate),
            "serious" => Some(Impact::Serious),
            "critical" => Some(Impact::Critical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Minor => "minor",
            Impact::Moderate => "moderate",
            Impact::Serious => "serious",
            Impact::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DOM location hint attached to a violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationNode {
    /// Raw HTML excerpt of the offending element.
    pub html: String,
    /// CSS selector path to the element.
    pub target: String,
}

/// A single rule failure as stored on a completed scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Audit-engine rule identifier.
    pub id: String,
    pub impact: Impact,
    /// Short user-facing label.
    pub description: String,
    /// Remediation text.
    pub help: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<ViolationNode>,
}
