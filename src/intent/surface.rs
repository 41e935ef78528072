//! External surface for command side effects
//!
//! Commands like "play" and "search" open pages in the user's browser.
//! The executor only talks to [`ExternalSurface`], so tests can record the
//! calls instead of launching anything.

use std::process::{Command, ExitStatus};
use std::sync::Mutex;
use std::thread::JoinHandle;
use url::Url;

pub const YOUTUBE_URL: &str = "https://www.youtube.com";
pub const GOOGLE_URL: &str = "https://www.google.com";

/// Where command side effects land
#[cfg_attr(test, mockall::automock)]
pub trait ExternalSurface: Send + Sync {
    /// Open a URL in a new browser tab
    fn open_url(&self, url: &str);

    /// Close whatever media tab this surface opened last
    fn close_media(&self);
}

/// YouTube results page for a song
///
/// " song" is appended to steer results toward music.
pub fn youtube_search_url(song: &str) -> String {
    let query = format!("{} song", song);
    match Url::parse_with_params(&format!("{}/results", YOUTUBE_URL), &[("search_query", query)]) {
        Ok(url) => url.to_string(),
        Err(_) => YOUTUBE_URL.to_string(),
    }
}

/// Google results page for a query
pub fn google_search_url(query: &str) -> String {
    match Url::parse_with_params(&format!("{}/search", GOOGLE_URL), &[("q", query)]) {
        Ok(url) => url.to_string(),
        Err(_) => GOOGLE_URL.to_string(),
    }
}

/// Spawn a launcher and reap it on a background thread
///
/// The handle yields the exit status, or `None` if waiting failed.
fn launch(mut command: Command) -> std::io::Result<JoinHandle<Option<ExitStatus>>> {
    let mut child = command.spawn()?;
    Ok(std::thread::spawn(move || match child.wait() {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::debug!("Could not wait for launcher: {}", e);
            None
        }
    }))
}

/// Opens URLs with the platform's browser launcher
///
/// A spawned tab cannot be closed from here, so `close_media` only forgets
/// the last media URL.
#[derive(Debug, Default)]
pub struct SystemSurface {
    last_opened: Mutex<Option<String>>,
}

impl SystemSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last URL handed to the browser
    pub fn last_opened(&self) -> Option<String> {
        self.last_opened.lock().ok().and_then(|g| g.clone())
    }
}

impl ExternalSurface for SystemSurface {
    fn open_url(&self, url: &str) {
        tracing::info!("Opening {}", url);

        #[cfg(target_os = "macos")]
        let launched = launch({
            let mut command = Command::new("open");
            command.arg(url);
            command
        });
        #[cfg(target_os = "linux")]
        let launched = launch({
            let mut command = Command::new("xdg-open");
            command.arg(url);
            command
        });
        #[cfg(target_os = "windows")]
        let launched = launch({
            let mut command = Command::new("cmd");
            command.args(["/C", "start", "", url]);
            command
        });
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        let launched: std::io::Result<JoinHandle<Option<ExitStatus>>> = Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "no browser launcher for this platform",
        ));

        if let Err(e) = launched {
            tracing::warn!("Could not open browser for {}: {}", url, e);
        }

        if let Ok(mut last) = self.last_opened.lock() {
            *last = Some(url.to_string());
        }
    }

    fn close_media(&self) {
        if let Ok(mut last) = self.last_opened.lock() {
            if let Some(url) = last.take() {
                tracing::debug!("Released media tab {}", url);
            }
        }
    }
}
