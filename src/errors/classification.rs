use super::types::ScannerError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    /// The error ends a scan in the `failed` state instead of reaching the caller.
    pub audit_failure: bool,
}

impl ScannerError {
    /// Classify this error by type name and by whether it belongs to the audit stage.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Audit-stage errors collapse into a failed scan record
            ScannerError::Upstream(_) => ErrorClassification {
                error_type: "UpstreamError",
                audit_failure: true,
            },
            ScannerError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                audit_failure: true,
            },
            ScannerError::NavigationTimeout(_) => ErrorClassification {
                error_type: "NavigationTimeoutError",
                audit_failure: true,
            },
            ScannerError::Launch(_) => ErrorClassification {
                error_type: "LaunchError",
                audit_failure: true,
            },
            ScannerError::Engine(_) => ErrorClassification {
                error_type: "EngineError",
                audit_failure: true,
            },
            ScannerError::Parse(_) => ErrorClassification {
                error_type: "ParseError",
                audit_failure: true,
            },
            ScannerError::Cancelled(_) => ErrorClassification {
                error_type: "CancelledError",
                audit_failure: true,
            },

            // Surfaced to the caller
            ScannerError::InvalidInput(_) => ErrorClassification {
                error_type: "InvalidInputError",
                audit_failure: false,
            },
            ScannerError::StoreUnavailable(_) => ErrorClassification {
                error_type: "StoreUnavailableError",
                audit_failure: false,
            },
            ScannerError::QuotaExceeded(_) => ErrorClassification {
                error_type: "QuotaExceededError",
                audit_failure: false,
            },
            ScannerError::Unauthorized(_) => ErrorClassification {
                error_type: "UnauthorizedError",
                audit_failure: false,
            },
            ScannerError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                audit_failure: false,
            },
            ScannerError::Io(_) => ErrorClassification {
                error_type: "IoError",
                audit_failure: false,
            },
            ScannerError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                audit_failure: false,
            },
            ScannerError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                audit_failure: false,
            },
            ScannerError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                audit_failure: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_errors_are_terminal_failures() {
        let errors = [
            ScannerError::Upstream("503".into()),
            ScannerError::Timeout("60s".into()),
            ScannerError::NavigationTimeout("30s".into()),
            ScannerError::Launch("no chrome".into()),
            ScannerError::Engine("axe crashed".into()),
            ScannerError::Parse("bad shape".into()),
        ];
        for e in &errors {
            assert!(e.classify().audit_failure, "{} should fail the scan", e);
        }
    }

    #[test]
    fn test_caller_errors_are_surfaced() {
        assert!(!ScannerError::InvalidInput("x".into()).classify().audit_failure);
        assert!(!ScannerError::StoreUnavailable("x".into()).classify().audit_failure);
        assert!(!ScannerError::QuotaExceeded("x".into()).classify().audit_failure);
    }

    #[test]
    fn test_error_type_names() {
        assert_eq!(ScannerError::Timeout("x".into()).classify().error_type, "TimeoutError");
        assert_eq!(ScannerError::Parse("x".into()).classify().error_type, "ParseError");
    }

    #[test]
    fn test_rusqlite_error_maps_to_store_unavailable() {
        let e: ScannerError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(e, ScannerError::StoreUnavailable(_)));
    }
}
