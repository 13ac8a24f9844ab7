use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};
use crate::config::BrowserConfig;
use crate::errors::ScannerError;
use super::executable::resolve_executable;
use super::runner::install_runner;
use super::session::{BrowserLauncher, BrowserSession};

const LAUNCH_TIMEOUT: Duration = Duration::from_secs(30);
const ENGINE_TIMEOUT: Duration = Duration::from_secs(120);
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);
/// Slack on top of the in-page navigation timeout before the process is presumed stuck.
const NAVIGATION_GRACE: Duration = Duration::from_secs(5);

/// Starts one Node.js runner process (puppeteer-core + axe-core) per scan.
pub struct NodeLauncher {
    node_binary: String,
    chrome_path: PathBuf,
    script: PathBuf,
    node_path: Option<PathBuf>,
}

impl NodeLauncher {
    pub fn new(config: &BrowserConfig) -> Result<Self, ScannerError> {
        let chrome_path = resolve_executable(config)?;
        let dir = config
            .runner_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("a11y-scanner"));
        let script = install_runner(&dir)?;
        let node_path = config
            .runner_dir
            .as_ref()
            .map(|d| PathBuf::from(d).join("node_modules"));

        info!(chrome = %chrome_path.display(), runner = %script.display(), "Headless browser backend ready");

        Ok(Self {
            node_binary: config.node_binary.clone(),
            chrome_path,
            script,
            node_path,
        })
    }
}

#[async_trait]
impl BrowserLauncher for NodeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ScannerError> {
        let mut cmd = Command::new(&self.node_binary);
        cmd.arg(&self.script).env("CHROME_PATH", &self.chrome_path);
        if let Some(node_path) = &self.node_path {
            cmd.env("NODE_PATH", node_path);
        }

        let mut session = start_runner(cmd)
            .map_err(|e| ScannerError::Launch(format!("Failed to start {}: {}", self.node_binary, e)))?;

        let ready = session
            .read_line(LAUNCH_TIMEOUT)
            .await
            .map_err(|e| ScannerError::Launch(e.to_string()))?;
        if ready.get("event").and_then(Value::as_str) != Some("ready") {
            let message = ready
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Runner did not report ready");
            return Err(ScannerError::Launch(message.to_string()));
        }

        debug!(pgid = ?session.pgid, "Browser launched");
        Ok(Box::new(session))
    }
}

/// Spawn the runner as the leader of a new process group, so Chromium and its
/// helpers can be killed together when the runner cannot shut them down.
fn start_runner(mut cmd: Command) -> std::io::Result<NodeBrowserSession> {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = cmd.spawn()?;
    let pgid = child.id();
    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| std::io::Error::other("runner stdin unavailable"))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("runner stdout unavailable"))?;

    Ok(NodeBrowserSession {
        child,
        pgid,
        stdin,
        stdout: BufReader::new(stdout).lines(),
        exited: false,
    })
}

#[cfg(unix)]
fn kill_process_group(pgid: u32) {
    // SAFETY: killpg takes no pointers; a group that is already gone yields ESRCH.
    let rc = unsafe { libc::killpg(pgid as libc::pid_t, libc::SIGKILL) };
    if rc != 0 {
        debug!(pgid, "Runner process group already gone");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pgid: u32) {}

struct NodeBrowserSession {
    child: Child,
    pgid: Option<u32>,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    /// Set once the runner has shut Chromium down itself.
    exited: bool,
}

impl NodeBrowserSession {
    /// SIGKILL the runner together with every browser process it started.
    fn kill_tree(&mut self) {
        if let Some(pgid) = self.pgid.take() {
            kill_process_group(pgid);
        }
        let _ = self.child.start_kill();
    }

    async fn send(&mut self, command: Value) -> Result<(), ScannerError> {
        let mut line = command.to_string();
        line.push('\n');
        self.stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| ScannerError::Engine(format!("Runner stdin closed: {}", e)))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| ScannerError::Engine(format!("Runner stdin closed: {}", e)))
    }

    async fn read_line(&mut self, limit: Duration) -> Result<Value, ScannerError> {
        let line = tokio::time::timeout(limit, self.stdout.next_line())
            .await
            .map_err(|_| ScannerError::Timeout(format!("Runner silent for {:?}", limit)))?
            .map_err(|e| ScannerError::Engine(format!("Runner output unreadable: {}", e)))?
            .ok_or_else(|| ScannerError::Engine("Runner exited unexpectedly".into()))?;
        serde_json::from_str(&line)
            .map_err(|e| ScannerError::Engine(format!("Runner sent invalid JSON: {}", e)))
    }
}

/// Turn a runner reply into its payload or the matching error.
pub(crate) fn reply_result(reply: Value) -> Result<Value, ScannerError> {
    if reply.get("ok").and_then(Value::as_bool) == Some(true) {
        return Ok(reply.get("result").cloned().unwrap_or(Value::Null));
    }
    let message = reply
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown runner error")
        .to_string();
    Err(match reply.get("kind").and_then(Value::as_str) {
        Some("navigation_timeout") => ScannerError::NavigationTimeout(message),
        Some("navigation") => ScannerError::Upstream(format!("Navigation failed: {}", message)),
        Some("launch") => ScannerError::Launch(message),
        _ => ScannerError::Engine(message),
    })
}

#[async_trait]
impl BrowserSession for NodeBrowserSession {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), ScannerError> {
        self.send(json!({
            "action": "navigate",
            "url": url,
            "timeoutMs": timeout.as_millis() as u64,
        }))
        .await?;
        let reply = self
            .read_line(timeout + NAVIGATION_GRACE)
            .await
            .map_err(|e| match e {
                ScannerError::Timeout(_) => {
                    ScannerError::NavigationTimeout(format!("Navigation exceeded {:?}", timeout))
                }
                other => other,
            })?;
        reply_result(reply).map(|_| ())
    }

    async fn run_axe(&mut self) -> Result<Value, ScannerError> {
        self.send(json!({ "action": "axe" })).await?;
        let reply = self
            .read_line(ENGINE_TIMEOUT)
            .await
            .map_err(|e| match e {
                ScannerError::Timeout(m) => ScannerError::Engine(m),
                other => other,
            })?;
        reply_result(reply)
    }

    async fn close(&mut self) -> Result<(), ScannerError> {
        if self.send(json!({ "action": "close" })).await.is_ok() {
            if let Ok(Ok(status)) = tokio::time::timeout(CLOSE_TIMEOUT, self.child.wait()).await {
                debug!(%status, "Browser runner exited");
                self.exited = true;
                return Ok(());
            }
        }
        warn!("Browser runner did not exit cleanly, killing its process group");
        self.kill_tree();
        self.child
            .wait()
            .await
            .map(|_| ())
            .map_err(|e| ScannerError::Engine(format!("Failed to reap runner: {}", e)))
    }
}

impl Drop for NodeBrowserSession {
    fn drop(&mut self) {
        if !self.exited {
            self.kill_tree();
        }
    }
}
