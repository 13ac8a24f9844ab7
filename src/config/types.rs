use serde::{Deserialize, Serialize};
use std::time::Duration;
use super::credentials::resolve_credential;

pub const DEFAULT_PAGESPEED_ENDPOINT: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";
pub const PAGESPEED_API_KEY_ENV: &str = "GOOGLE_PAGESPEED_API_KEY";
pub const CHROMIUM_PATH_ENV: &str = "CHROMIUM_PATH";

const REMOTE_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ScannerConfig {
    pub server: ServerConfig,
    pub audit: AuditConfig,
    pub remote: RemoteConfig,
    pub browser: BrowserConfig,
    pub quota: QuotaConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database: "./data/a11y.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuditBackend {
    /// Third-party PageSpeed/Lighthouse API
    #[default]
    Remote,
    /// Local Chromium driven with axe-core
    Headless,
}

impl AuditBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Headless => "headless",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "remote" => Some(Self::Remote),
            "headless" => Some(Self::Headless),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    /// The submission request waits for the audit outcome.
    #[default]
    Synchronous,
    /// The submission request returns once the pending record exists.
    FireAndForget,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Synchronous => "synchronous",
            Self::FireAndForget => "fire-and-forget",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "synchronous" | "sync" => Some(Self::Synchronous),
            "fire-and-forget" | "background" => Some(Self::FireAndForget),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScoreStrategy {
    /// `round(category_score * 100)` from the audit engine
    Direct,
    /// 100 minus a fixed penalty per violation impact
    Weighted,
}

impl ScoreStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Weighted => "weighted",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuditConfig {
    pub backend: AuditBackend,
    pub mode: ExecutionMode,
    pub scoring: Option<ScoreStrategy>,
    pub timeout_secs: Option<u64>,
}

impl AuditConfig {
    pub fn score_strategy(&self) -> ScoreStrategy {
        self.scoring.unwrap_or(match self.backend {
            AuditBackend::Remote => ScoreStrategy::Direct,
            AuditBackend::Headless => ScoreStrategy::Weighted,
        })
    }

    /// Orchestrator deadline. Headless audits rely on the navigation timeout unless set.
    pub fn timeout(&self) -> Option<Duration> {
        match (self.timeout_secs, self.backend) {
            (Some(secs), _) => Some(Duration::from_secs(secs)),
            (None, AuditBackend::Remote) => Some(Duration::from_secs(REMOTE_TIMEOUT_SECS)),
            (None, AuditBackend::Headless) => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PAGESPEED_ENDPOINT.to_string(),
            api_key: None,
        }
    }
}

impl RemoteConfig {
    /// `api_key` (literal or `$VAR`), else `GOOGLE_PAGESPEED_API_KEY`.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .and_then(resolve_credential)
            .or_else(|| std::env::var(PAGESPEED_API_KEY_ENV).ok().filter(|k| !k.is_empty()))
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutableMode {
    /// Minimal Chromium build shipped with the deployment
    BundledMinimal,
    /// Chrome/Chromium installed on the host
    #[default]
    SystemInstalled,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub executable: ExecutableMode,
    pub bundled_path: String,
    pub node_binary: String,
    /// Directory holding `node_modules` with puppeteer-core and axe-core.
    pub runner_dir: Option<String>,
    pub navigation_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            executable: ExecutableMode::SystemInstalled,
            bundled_path: "/opt/chromium/chromium".to_string(),
            node_binary: "node".to_string(),
            runner_dir: None,
            navigation_timeout_secs: 30,
        }
    }
}

impl BrowserConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QuotaConfig {
    pub monthly_limit: u32,
    pub enforce: bool,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self { monthly_limit: 5, enforce: true }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Base URL used when building magic links.
    pub public_base_url: String,
    pub login_token_ttl_minutes: i64,
    pub session_ttl_days: i64,
    /// Return the magic link in the API response (development only).
    pub echo_link: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            public_base_url: "http://localhost:8080".to_string(),
            login_token_ttl_minutes: 15,
            session_ttl_days: 30,
            echo_link: false,
        }
    }
}
