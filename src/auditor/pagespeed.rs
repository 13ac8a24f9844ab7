use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::debug;
use crate::config::credentials::redact_secret;
use crate::config::RemoteConfig;
use crate::errors::ScannerError;
use crate::models::{ViolationNode, MAX_NODES_PER_VIOLATION, MAX_VIOLATIONS};
use crate::utils::truncation::truncate_error;
use super::provider::Auditor;
use super::types::{AuditReport, RawFinding};

/// Google PageSpeed Insights (Lighthouse) scoped to the accessibility category.
pub struct PageSpeedAuditor {
    client: Client,
    endpoint: url::Url,
    api_key: Option<String>,
}

impl PageSpeedAuditor {
    pub fn new(config: &RemoteConfig) -> Result<Self, ScannerError> {
        let endpoint = url::Url::parse(&config.endpoint)
            .map_err(|e| ScannerError::Config(format!("Invalid PageSpeed endpoint: {}", e)))?;
        let client = Client::builder()
            .user_agent(concat!("a11y-scanner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScannerError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.resolved_api_key(),
        })
    }

    fn request_error(&self, e: reqwest::Error, timeout: Option<Duration>) -> ScannerError {
        if e.is_timeout() {
            ScannerError::Timeout(format!(
                "PageSpeed request exceeded {:?}",
                timeout.unwrap_or_default()
            ))
        } else {
            let message = redact_secret(&e.to_string(), self.api_key.as_deref());
            ScannerError::Upstream(format!("PageSpeed request failed: {}", message))
        }
    }

    fn request_url(&self, target: &str) -> url::Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("url", target);
            query.append_pair("category", "accessibility");
            if let Some(key) = &self.api_key {
                query.append_pair("key", key);
            }
        }
        url
    }
}

#[async_trait]
impl Auditor for PageSpeedAuditor {
    async fn audit(&self, url: &str, timeout: Option<Duration>) -> Result<AuditReport, ScannerError> {
        debug!(target_url = %url, ?timeout, "Requesting PageSpeed audit");

        let mut request = self.client.get(self.request_url(url));
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let resp = request.send().await.map_err(|e| self.request_error(e, timeout))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ScannerError::Upstream(format!(
                "PageSpeed API error: {} {}",
                status.as_u16(),
                truncate_error(body.trim())
            )));
        }

        let body = resp.text().await.map_err(|e| self.request_error(e, timeout))?;
        let data: Value = serde_json::from_str(&body)
            .map_err(|e| ScannerError::Parse(format!("PageSpeed response is not JSON: {}", e)))?;

        parse_pagespeed_response(&data)
    }

    fn backend_name(&self) -> &str { "pagespeed" }
}


/// Extract the category score and failing audits from a PageSpeed v5 response.
///
/// Audits keep response order; only those with a numeric score below 1 count as
/// findings, and at most 20 are returned.
pub fn parse_pagespeed_response(data: &Value) -> Result<AuditReport, ScannerError> {
    let lighthouse = data
        .get("lighthouseResult")
        .and_then(Value::as_object)
        .ok_or_else(|| ScannerError::Parse("Response has no lighthouseResult object".into()))?;

    let category_score = lighthouse
        .get("categories")
        .and_then(|c| c.get("accessibility"))
        .and_then(|a| a.get("score"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
        .clamp(0.0, 1.0);

    let empty = Map::new();
    let audits = match lighthouse.get("audits") {
        None | Some(Value::Null) => &empty,
        Some(Value::Object(audits)) => audits,
        Some(_) => return Err(ScannerError::Parse("lighthouseResult.audits is not an object".into())),
    };

    let findings = audits
        .iter()
        .filter_map(|(id, audit)| {
            let score = audit.get("score").and_then(Value::as_f64)?;
            (score < 1.0).then(|| RawFinding {
                id: id.clone(),
                title: string_field(audit, "title"),
                description: string_field(audit, "description"),
                impact: None,
                sub_score: Some(score),
                nodes: audit_nodes(audit),
            })
        })
        .take(MAX_VIOLATIONS)
        .collect();

    Ok(AuditReport::new(Some(category_score), findings))
}

fn string_field(value: &Value, key: &str) -> String {
    value.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

/// Lighthouse lists offending elements under `details.items[].node`.
fn audit_nodes(audit: &Value) -> Vec<ViolationNode> {
    audit
        .pointer("/details/items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("node"))
                .map(|node| ViolationNode {
                    html: string_field(node, "snippet"),
                    target: string_field(node, "selector"),
                })
                .take(MAX_NODES_PER_VIOLATION)
                .collect()
        })
        .unwrap_or_default()
}
