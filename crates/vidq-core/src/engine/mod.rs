//! Extraction engine boundary.
//!
//! The engine is a black box consumed through two calls: a metadata probe
//! and a full retrieval that streams [`ProgressEvent`]s back to the caller.
//! [`YtDlp`] drives the yt-dlp binary; tests substitute their own [`Engine`].

mod args;
mod classify;
mod cookies;
mod progress_line;
mod ytdlp;

pub use classify::classify_failure;
pub use cookies::is_netscape_cookie_file;
pub use progress_line::{parse_progress_line, PROGRESS_MARKER};
pub use ytdlp::{YtDlp, DEFAULT_BINARY};

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::format::{select_format, FormatExpression};
use crate::job::{Auth, JobConfig};
use crate::progress::ProgressEvent;

/// Output name template: engine-provided title and extension.
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("extraction engine '{0}' not found in PATH")]
    NotInstalled(String),

    #[error("failed to start extraction engine: {0}")]
    Spawn(#[source] std::io::Error),

    /// The engine could not resolve or fetch the requested media.
    #[error("extraction failed: {message}")]
    Extraction { message: String },

    /// The engine could not write the output file.
    #[error("write failed: {message}")]
    Write { message: String },

    #[error("unreadable metadata from engine: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Metadata returned by the probe phase.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MediaInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub extractor: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

impl MediaInfo {
    /// Display title, `Unknown` when the source provides none.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Unknown")
    }
}

/// Options record handed to the engine for one URL.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub format: FormatExpression,
    /// Full output path template (directory joined with [`OUTPUT_TEMPLATE`]).
    pub output_template: PathBuf,
    /// Container to merge and remux into.
    pub container: String,
    pub proxy: Option<String>,
    pub cookies_from_browser: Option<String>,
    pub cookie_file: Option<PathBuf>,
}

impl EngineOptions {
    pub fn from_config(config: &JobConfig) -> Self {
        let (cookies_from_browser, cookie_file) = match &config.auth {
            Auth::None => (None, None),
            Auth::BrowserCookies(browser) => (Some(browser.clone()), None),
            Auth::CookieFile(path) => (None, Some(path.clone())),
        };
        Self {
            format: select_format(config.quality, config.video_codec),
            output_template: config.output_dir.join(OUTPUT_TEMPLATE),
            container: config.container.clone(),
            proxy: config.egress.proxy_url(&config.tor_endpoint),
            cookies_from_browser,
            cookie_file,
        }
    }
}

/// The external extraction engine.
pub trait Engine {
    /// Fetches metadata only; downloads nothing.
    fn probe(&self, url: &str, opts: &EngineOptions) -> Result<MediaInfo, EngineError>;

    /// Downloads and converts `url`, reporting progress through `on_progress`.
    fn retrieve(
        &self,
        url: &str,
        opts: &EngineOptions,
        on_progress: &mut dyn FnMut(ProgressEvent),
    ) -> Result<(), EngineError>;
}

impl<E: Engine + ?Sized> Engine for &E {
    fn probe(&self, url: &str, opts: &EngineOptions) -> Result<MediaInfo, EngineError> {
        (**self).probe(url, opts)
    }

    fn retrieve(
        &self,
        url: &str,
        opts: &EngineOptions,
        on_progress: &mut dyn FnMut(ProgressEvent),
    ) -> Result<(), EngineError> {
        (**self).retrieve(url, opts, on_progress)
    }
}
