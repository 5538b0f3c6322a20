//! Provider that launches a local Chrome with remote debugging enabled.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tracing::{info, warn};

use crate::client::fetch_version;
use crate::error::CdpError;

use super::BrowserProvider;

/// Upper bound for one debug-port probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Local Chrome configuration.
#[derive(Debug, Clone)]
pub struct LocalChromeConfig {
    /// Chrome debugging port.
    pub debug_port: u16,
    /// Profile directory for the launched browser.
    pub profile_dir: Option<PathBuf>,
    /// Whether to run Chrome in headless mode.
    pub headless: bool,
    /// How long to wait for the debugging endpoint to answer after launch.
    pub launch_timeout: Duration,
}

impl Default for LocalChromeConfig {
    fn default() -> Self {
        Self {
            debug_port: 9222,
            profile_dir: None,
            headless: true,
            launch_timeout: Duration::from_secs(6),
        }
    }
}

impl LocalChromeConfig {
    /// Get the profile directory, falling back to one under the home directory.
    pub fn get_profile_dir(&self) -> PathBuf {
        self.profile_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".menuscrape")
                .join("browser-profile")
        })
    }

    /// Get the CDP endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("http://localhost:{}", self.debug_port)
    }
}

/// Chrome on this machine, reused if already listening on the debug port.
pub struct LocalChrome {
    config: LocalChromeConfig,
    /// Chrome process handle (if we launched it).
    process: Option<Child>,
    started: bool,
}

impl LocalChrome {
    /// Create a provider; nothing is launched until `start`.
    pub fn new(config: LocalChromeConfig) -> Self {
        Self {
            config,
            process: None,
            started: false,
        }
    }

    /// Find Chrome executable path.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        let paths: &[&str] = &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
        ];

        #[cfg(target_os = "linux")]
        let paths: &[&str] = &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];

        #[cfg(target_os = "windows")]
        let paths: &[&str] = &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        let paths: &[&str] = &[];

        paths.iter().map(PathBuf::from).find(|p| p.exists())
    }

    /// Check if a browser already answers on the debug port.
    pub(crate) async fn is_running(&self) -> bool {
        let version_url = format!("{}/json/version", self.config.endpoint());
        fetch_version(&version_url, PROBE_TIMEOUT).await.is_ok()
    }

    /// Launch Chrome with remote debugging enabled.
    async fn launch(&self) -> Result<Child, CdpError> {
        let chrome_path = Self::find_chrome().ok_or(CdpError::ChromeNotFound)?;
        let profile_dir = self.config.get_profile_dir();

        if let Err(e) = std::fs::create_dir_all(&profile_dir) {
            warn!("Failed to create profile directory: {}", e);
        }

        info!("Launching Chrome with profile at: {}", profile_dir.display());

        let mut cmd = Command::new(&chrome_path);
        cmd.arg(format!("--remote-debugging-port={}", self.config.debug_port))
            .arg(format!("--user-data-dir={}", profile_dir.display()))
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("--disable-sync")
            .arg("--disable-translate")
            .arg("--metrics-recording-only")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        if self.config.headless {
            cmd.arg("--headless=new");
        }

        let child = cmd
            .spawn()
            .map_err(|e| CdpError::LaunchFailed(e.to_string()))?;

        info!("Chrome launched with PID: {:?}", child.id());
        Ok(child)
    }
}

#[async_trait]
impl BrowserProvider for LocalChrome {
    fn name(&self) -> &str {
        "local"
    }

    async fn start(&mut self) -> Result<(), CdpError> {
        if self.started {
            return Ok(());
        }

        if self.is_running().await {
            info!("Chrome already running on port {}", self.config.debug_port);
            self.started = true;
            return Ok(());
        }

        info!("Chrome not running on port {}, launching...", self.config.debug_port);
        self.process = Some(self.launch().await?);

        let deadline = Instant::now() + self.config.launch_timeout;
        while Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(200)).await;
            if self.is_running().await {
                self.started = true;
                return Ok(());
            }
        }

        if let Some(mut child) = self.process.take() {
            let _ = child.kill().await;
        }
        Err(CdpError::LaunchFailed(
            "Chrome failed to start within timeout".to_string(),
        ))
    }

    fn cdp_endpoint(&self) -> Result<String, CdpError> {
        if !self.started {
            return Err(CdpError::ConnectionFailed(
                "local Chrome provider not started".to_string(),
            ));
        }
        Ok(self.config.endpoint())
    }

    async fn stop(&mut self) -> Result<(), CdpError> {
        self.started = false;
        if let Some(mut child) = self.process.take() {
            info!("Shutting down Chrome...");
            child
                .kill()
                .await
                .map_err(|e| CdpError::LaunchFailed(format!("kill: {}", e)))?;
        }
        Ok(())
    }
}
