pub mod normalize;
pub mod orchestrator;
pub mod quota;
pub mod scoring;
pub mod validation;

pub use orchestrator::{OrchestratorSettings, ScanOrchestrator, ScanSubmission};
pub use quota::QuotaStatus;
pub use validation::{normalize_lookup_url, validate_scan_url};
