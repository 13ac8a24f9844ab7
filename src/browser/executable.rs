use std::path::{Path, PathBuf};
use crate::config::{BrowserConfig, ExecutableMode, CHROMIUM_PATH_ENV};
use crate::errors::ScannerError;

const SYSTEM_CANDIDATES: &[&str] = &[
    "google-chrome-stable",
    "google-chrome",
    "chromium",
    "chromium-browser",
];

const MACOS_CHROME: &str = "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome";

/// Locate the Chromium binary for the configured executable mode.
pub fn resolve_executable(config: &BrowserConfig) -> Result<PathBuf, ScannerError> {
    resolve_with(
        config.executable,
        &config.bundled_path,
        std::env::var(CHROMIUM_PATH_ENV).ok().as_deref(),
        std::env::var_os("PATH").as_deref().map(Path::new),
    )
}

pub(crate) fn resolve_with(
    mode: ExecutableMode,
    bundled_path: &str,
    env_override: Option<&str>,
    path_var: Option<&Path>,
) -> Result<PathBuf, ScannerError> {
    match mode {
        ExecutableMode::BundledMinimal => {
            let path = PathBuf::from(
                env_override.filter(|p| !p.trim().is_empty()).unwrap_or(bundled_path),
            );
            if path.is_file() {
                Ok(path)
            } else {
                Err(ScannerError::Launch(format!(
                    "Bundled Chromium not found at {}",
                    path.display()
                )))
            }
        }
        ExecutableMode::SystemInstalled => {
            if let Some(path) = env_override.filter(|p| !p.trim().is_empty()).map(PathBuf::from) {
                if path.is_file() {
                    return Ok(path);
                }
            }
            let dirs: Vec<PathBuf> = path_var
                .map(|p| std::env::split_paths(p.as_os_str()).collect())
                .unwrap_or_default();
            for name in SYSTEM_CANDIDATES {
                if let Some(found) = dirs.iter().map(|d| d.join(name)).find(|p| p.is_file()) {
                    return Ok(found);
                }
            }
            let mac = PathBuf::from(MACOS_CHROME);
            if mac.is_file() {
                return Ok(mac);
            }
            Err(ScannerError::Launch(
                "No system Chrome or Chromium installation found on PATH".into(),
            ))
        }
    }
}
