//! Capture through a headless Chromium-family browser
//!
//! Each capture writes the document into a private profile directory, asks the
//! browser for a window-sized screenshot after a virtual-time settle delay,
//! and decodes the resulting PNG. The profile lives as long as the capturer.

use super::{Capturer, Document};
use crate::io::configuration::CaptureConfig;
use crate::io::error::{ObserverError, Result, WithPath};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Browser-backed capture session
#[derive(Debug)]
pub struct BrowserCapturer {
    executable: PathBuf,
    profile: TempDir,
    config: CaptureConfig,
    captures: usize,
}

impl BrowserCapturer {
    /// Start a session using the given browser executable
    ///
    /// # Errors
    ///
    /// Returns an error if the private profile directory cannot be created
    pub fn launch(executable: impl Into<PathBuf>, config: CaptureConfig) -> Result<Self> {
        let profile = tempfile::Builder::new()
            .prefix("fractal-observer-")
            .tempdir()
            .map_err(|source| ObserverError::FileSystem {
                path: std::env::temp_dir(),
                operation: "create browser profile",
                source,
            })?;
        let executable = executable.into();
        info!(browser = %executable.display(), "browser session ready");
        let session = Self {
            executable,
            profile,
            config,
            captures: 0,
        };
        debug!(profile = %session.profile_dir().display(), "browser profile created");
        Ok(session)
    }

    /// Directory holding pages and screenshots for this session
    pub fn profile_dir(&self) -> &Path {
        self.profile.path()
    }

    /// Number of capture attempts made so far
    pub const fn captures(&self) -> usize {
        self.captures
    }

    /// End the session and remove its profile directory
    ///
    /// # Errors
    ///
    /// Returns an error if the profile directory cannot be removed
    pub fn close(self) -> Result<()> {
        let path = self.profile_dir().to_path_buf();
        info!(captures = self.captures(), "browser session closed");
        self.profile.close().with_path(&path, "remove browser profile")
    }

    fn command(&self, page: &Path, screenshot: &Path, document: &Document) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--hide-scrollbars")
            .arg(format!("--user-data-dir={}", self.profile_dir().join("profile").display()))
            .arg(format!("--window-size={},{}", document.width, document.height))
            .arg(format!("--virtual-time-budget={}", self.config.settle_delay_ms))
            .arg(format!("--screenshot={}", screenshot.display()))
            .arg(format!("file://{}", page.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }

    fn wait_for_exit(&self, command: &mut Command) -> Result<()> {
        let mut child = command.spawn().map_err(|e| ObserverError::Capture {
            reason: format!("failed to start {}: {e}", self.executable.display()),
        })?;

        let timeout = Duration::from_secs(self.config.timeout_secs);
        let started = Instant::now();
        loop {
            let status = child.try_wait().map_err(|e| ObserverError::Capture {
                reason: format!("lost track of browser process: {e}"),
            })?;
            if let Some(status) = status {
                if status.success() {
                    return Ok(());
                }
                return Err(ObserverError::Capture {
                    reason: format!("browser exited with {status}"),
                });
            }
            if started.elapsed() >= timeout {
                // Already-exited races are fine; the screenshot is discarded either way
                let _ = child.kill();
                let _ = child.wait();
                return Err(ObserverError::Capture {
                    reason: format!("browser did not finish within {}s", self.config.timeout_secs),
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Capturer for BrowserCapturer {
    fn capture(&mut self, document: &Document) -> Result<DynamicImage> {
        self.captures += 1;
        let page = self.profile_dir().join(format!("capture_{}.html", self.captures()));
        let screenshot = self.profile_dir().join(format!("capture_{}.png", self.captures()));
        std::fs::write(&page, &document.markup).with_path(&page, "write capture page")?;

        let mut command = self.command(&page, &screenshot, document);
        debug!(page = %page.display(), "requesting screenshot");
        self.wait_for_exit(&mut command)?;

        image::open(&screenshot).map_err(|e| ObserverError::Capture {
            reason: format!("unreadable screenshot {}: {e}", screenshot.display()),
        })
    }
}
