//! Checks on config values that are later emitted verbatim: the PageSpeed
//! endpoint is requested by the server, the public base URL is written into
//! magic links and HTML attributes.

use url::Url;

use super::types::{AuditBackend, ScannerConfig};
use crate::errors::ScannerError;

/// Characters that would close an HTML attribute or tag around the value.
const MARKUP_CHARS: &[char] = &['<', '>', '"', '\'', '`'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkUse {
    /// Requested by the scanner itself.
    Outbound,
    /// Prefix for links handed to users; paths are appended to it.
    PublicPrefix,
}

pub fn validate_link_targets(config: &ScannerConfig) -> Result<(), ScannerError> {
    if config.audit.backend == AuditBackend::Remote {
        check_link("remote.endpoint", &config.remote.endpoint, LinkUse::Outbound)?;
    }
    check_link("auth.public_base_url", &config.auth.public_base_url, LinkUse::PublicPrefix)?;
    Ok(())
}

fn check_link(field: &str, value: &str, usage: LinkUse) -> Result<(), ScannerError> {
    let reject = |reason: String| ScannerError::Config(format!("{}: {}", field, reason));

    if let Some(c) = value.chars().find(|c| MARKUP_CHARS.contains(c) || c.is_control()) {
        return Err(reject(format!("contains forbidden character {:?}", c)));
    }

    let url = Url::parse(value).map_err(|e| reject(format!("not a valid URL ({})", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(reject(format!("must use http or https, got '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(reject("has no host".into()));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(reject("must not embed credentials".into()));
    }

    if usage == LinkUse::PublicPrefix && (url.query().is_some() || url.fragment().is_some()) {
        return Err(reject("must not carry a query or fragment".into()));
    }

    Ok(())
}
