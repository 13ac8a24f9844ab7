pub mod provider;
pub mod pagespeed;
pub mod headless;
pub mod router;
pub mod types;

pub use provider::Auditor;
pub use router::create_auditor;
pub use types::{AuditReport, RawFinding};
