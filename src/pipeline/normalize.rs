use crate::auditor::RawFinding;
use crate::models::{Impact, Violation, MAX_NODES_PER_VIOLATION, MAX_VIOLATIONS};
use crate::translate::translate;

/// Translate raw engine findings into stored violations, preserving order.
pub fn normalize_findings(findings: Vec<RawFinding>) -> Vec<Violation> {
    findings
        .into_iter()
        .take(MAX_VIOLATIONS)
        .map(|finding| {
            let translation = translate(&finding.id, &finding.title, &finding.description);
            Violation {
                impact: Impact::resolve(finding.impact, finding.sub_score),
                description: translation.title,
                help: translation.help,
                nodes: finding.nodes.into_iter().take(MAX_NODES_PER_VIOLATION).collect(),
                id: finding.id,
            }
        })
        .collect()
}
