use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScannerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Monthly quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Navigation timeout: {0}")]
    NavigationTimeout(String),

    #[error("Browser launch error: {0}")]
    Launch(String),

    #[error("Audit engine error: {0}")]
    Engine(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Audit cancelled: {0}")]
    Cancelled(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<rusqlite::Error> for ScannerError {
    fn from(e: rusqlite::Error) -> Self {
        ScannerError::StoreUnavailable(e.to_string())
    }
}
