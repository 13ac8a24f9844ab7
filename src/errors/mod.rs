pub mod types;
pub mod classification;

pub use types::ScannerError;
pub use classification::ErrorClassification;
