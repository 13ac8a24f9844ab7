use std::any::Any;
use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde_json::json;
use tracing::error;
use crate::errors::ScannerError;

impl IntoResponse for ScannerError {
    fn into_response(self) -> Response {
        let class = self.classify();
        let (status, body) = match &self {
            ScannerError::InvalidInput(details) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Invalid input", "details": details}),
            ),
            ScannerError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, json!({"error": message}))
            }
            ScannerError::QuotaExceeded(message) => {
                (StatusCode::TOO_MANY_REQUESTS, json!({"error": message}))
            }
            ScannerError::Cancelled(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({"error": "Service is shutting down"}),
            ),
            ScannerError::StoreUnavailable(_) => {
                error!(error = %self, error_type = class.error_type, "Storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "Storage unavailable"}))
            }
            _ if class.audit_failure => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "Scan failed"}))
            }
            _ => {
                error!(error = %self, error_type = class.error_type, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "Internal server error"}))
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Outermost safety net: a panicking handler yields a generic JSON 500.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "Internal server error"})),
    )
        .into_response()
}

pub fn not_found(what: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": format!("{} not found", what)}))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ScannerError::InvalidInput("bad".into()), StatusCode::BAD_REQUEST),
            (ScannerError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (ScannerError::QuotaExceeded("max".into()), StatusCode::TOO_MANY_REQUESTS),
            (ScannerError::StoreUnavailable("db".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ScannerError::Timeout("60s".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ScannerError::Cancelled("bye".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_panic_handler_is_json_500() {
        let resp = handle_panic(Box::new("boom"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
