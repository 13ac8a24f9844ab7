use std::path::Path;
use crate::errors::ScannerError;
use super::types::{AuditBackend, ScannerConfig, ScoreStrategy};
use super::security::validate_link_targets;
use super::schema::CONFIG_SCHEMA;
use tracing::warn;

pub async fn parse_config(path: &Path) -> Result<ScannerConfig, ScannerError> {
    if !path.exists() {
        return Err(ScannerError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(ScannerError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<ScannerConfig, ScannerError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;

    // An empty file is a valid, all-defaults config
    if yaml.is_null() {
        return Ok(ScannerConfig::default());
    }

    validate_schema(&yaml)?;

    let config: ScannerConfig = serde_yaml::from_value(yaml)?;
    validate_semantics(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), ScannerError> {
    let json_str = serde_json::to_string(yaml)
        .map_err(|e| ScannerError::Config(format!("Config conversion error: {}", e)))?;
    let json_value: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| ScannerError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| ScannerError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        // Advisory: typed deserialization below is the hard gate
        for e in errors {
            warn!(validation_error = %e, path = %e.instance_path, "Config schema warning");
        }
    }

    Ok(())
}

/// Reject combinations that cannot produce a coherent deployment.
pub fn validate_semantics(config: &ScannerConfig) -> Result<(), ScannerError> {
    if config.audit.backend == AuditBackend::Headless
        && config.audit.score_strategy() == ScoreStrategy::Direct
    {
        return Err(ScannerError::Config(
            "Scoring 'direct' needs a category score; the headless backend only reports violations. Use 'weighted'".into(),
        ));
    }

    if config.audit.timeout_secs == Some(0) {
        return Err(ScannerError::Config("audit.timeout_secs must be greater than zero".into()));
    }

    if config.browser.navigation_timeout_secs == 0 {
        return Err(ScannerError::Config("browser.navigation_timeout_secs must be greater than zero".into()));
    }

    validate_link_targets(config)?;

    if config.audit.backend == AuditBackend::Remote && config.remote.resolved_api_key().is_none() {
        warn!("No PageSpeed API key configured; requests will use the anonymous quota");
    }

    if config.quota.enforce && config.quota.monthly_limit == 0 {
        warn!("Quota enforcement is on with a monthly limit of 0; authenticated users cannot scan");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExecutableMode, ExecutionMode};

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.audit.backend, AuditBackend::Remote);
        assert_eq!(config.quota.monthly_limit, 5);
    }

    #[test]
    fn test_full_config_parses() {
        let yaml = r#"
server:
  port: 9000
audit:
  backend: headless
  mode: fire-and-forget
  scoring: weighted
browser:
  executable: bundled-minimal
  bundled_path: /opt/chromium/chrome
  navigation_timeout_secs: 20
quota:
  monthly_limit: 10
  enforce: false
"#;
        let config = parse_config_str(yaml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.audit.mode, ExecutionMode::FireAndForget);
        assert_eq!(config.browser.executable, ExecutableMode::BundledMinimal);
        assert_eq!(config.browser.navigation_timeout_secs, 20);
        assert!(!config.quota.enforce);
    }

    #[test]
    fn test_direct_scoring_with_headless_rejected() {
        let yaml = "audit:\n  backend: headless\n  scoring: direct\n";
        let err = parse_config_str(yaml).unwrap_err();
        assert!(matches!(err, ScannerError::Config(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let yaml = "audit:\n  timeout_secs: 0\n";
        assert!(parse_config_str(yaml).is_err());
    }

    #[test]
    fn test_non_http_endpoint_rejected() {
        let yaml = "remote:\n  endpoint: ftp://example.com/run\n";
        assert!(parse_config_str(yaml).is_err());
    }

    #[test]
    fn test_script_in_public_base_url_rejected() {
        let yaml = "auth:\n  public_base_url: 'http://x/<script>alert(1)</script>'\n";
        let err = parse_config_str(yaml).unwrap_err();
        assert!(err.to_string().contains("auth.public_base_url"));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let yaml = "audit:\n  backend: lighthouse-cli\n";
        assert!(matches!(parse_config_str(yaml), Err(ScannerError::Yaml(_))));
    }

    #[tokio::test]
    async fn test_parse_config_missing_file() {
        let err = parse_config(Path::new("/nonexistent/a11y.yaml")).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_parse_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a11y.yaml");
        std::fs::write(&path, "quota:\n  monthly_limit: 3\n").unwrap();
        let config = parse_config(&path).await.unwrap();
        assert_eq!(config.quota.monthly_limit, 3);
    }
}
