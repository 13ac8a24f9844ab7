use std::time::Duration;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};
use crate::errors::ScannerError;

/// One live headless browser with a single page.
#[async_trait]
pub trait BrowserSession: Send {
    /// Load `url` and wait for DOM content, failing with `NavigationTimeout` past `timeout`.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), ScannerError>;

    /// Inject axe-core into the loaded page and return its raw results object.
    async fn run_axe(&mut self) -> Result<Value, ScannerError>;

    async fn close(&mut self) -> Result<(), ScannerError>;
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ScannerError>;
}

/// Owns a session and guarantees it is closed exactly once.
///
/// Call [`SessionGuard::release`] on every normal path. If the guard is dropped
/// instead (the owning future was cancelled or panicked) the close is spawned
/// onto the current runtime.
pub struct SessionGuard {
    session: Option<Box<dyn BrowserSession>>,
}

impl SessionGuard {
    pub fn new(session: Box<dyn BrowserSession>) -> Self {
        Self { session: Some(session) }
    }

    pub fn session(&mut self) -> Result<&mut (dyn BrowserSession + 'static), ScannerError> {
        self.session
            .as_deref_mut()
            .ok_or_else(|| ScannerError::Internal("Browser session already released".into()))
    }

    pub async fn release(mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.close().await {
                warn!(error = %e, "Failed to close browser session");
            }
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let Some(mut session) = self.session.take() else { return };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!("Browser session dropped without release, closing in background");
                handle.spawn(async move {
                    if let Err(e) = session.close().await {
                        warn!(error = %e, "Background browser close failed");
                    }
                });
            }
            Err(_) => warn!("Browser session dropped outside a runtime"),
        }
    }
}
