use tracing::debug;

/// Resolve a credential value. A leading `$` names an environment variable.
pub fn resolve_credential(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.strip_prefix('$') {
        Some(var_name) => match std::env::var(var_name) {
            Ok(resolved) if !resolved.is_empty() => {
                debug!(var = %var_name, "Resolved credential from environment");
                Some(resolved)
            }
            _ => {
                debug!(var = %var_name, "Credential variable not set");
                None
            }
        },
        None => Some(value.to_string()),
    }
}

/// Mask a secret wherever it appears in `text` (URLs in transport errors, for one).
pub fn redact_secret(text: &str, secret: Option<&str>) -> String {
    match secret {
        Some(secret) if secret.len() >= 4 => text.replace(secret, "[REDACTED]"),
        _ => text.to_string(),
    }
}
