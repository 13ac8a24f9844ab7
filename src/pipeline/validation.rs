use url::Url;
use crate::errors::ScannerError;

/// Parse and check a submitted scan target.
///
/// Accepts only absolute `http`/`https` URLs with a host. The returned value is
/// the parser's normalized form, which is what gets stored.
pub fn validate_scan_url(raw: Option<&str>) -> Result<Url, ScannerError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(ScannerError::InvalidInput("URL is required".into()));
    }

    let url = Url::parse(raw)
        .map_err(|e| ScannerError::InvalidInput(format!("Invalid URL '{}': {}", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ScannerError::InvalidInput(format!(
            "Unsupported URL scheme '{}', expected http or https",
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ScannerError::InvalidInput("URL has no host".into()));
    }

    Ok(url)
}

/// Normalize a lookup key the same way submissions are stored, so
/// `https://example.com` finds the record saved as `https://example.com/`.
pub fn normalize_lookup_url(raw: &str) -> String {
    match validate_scan_url(Some(raw)) {
        Ok(url) => url.to_string(),
        Err(_) => raw.trim().to_string(),
    }
}
