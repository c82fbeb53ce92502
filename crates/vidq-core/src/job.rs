//! Job configuration: the immutable record of user choices for one run.
//!
//! Quality, codec and audio bitrate are closed enumerations; parsing anything
//! else fails with [`ConfigError::InvalidValue`] before any download starts.
//! Egress and authentication are each exactly one variant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Default local SOCKS endpoint for Tor routing.
pub const DEFAULT_TOR_PROXY: &str = "socks5://127.0.0.1:9050";

/// Default container the engine remuxes into.
pub const DEFAULT_CONTAINER: &str = "mp4";

/// Errors raised while building a [`JobConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field} '{value}' (expected one of: {expected})")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("invalid proxy URL '{value}': {source}")]
    InvalidProxy {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported proxy scheme '{0}' (expected http, https, socks4, socks4a, socks5 or socks5h)")]
    UnsupportedProxyScheme(String),

    #[error("browser name for cookie extraction must not be empty")]
    EmptyBrowser,
}

/// Maximum-resolution bucket used to bound stream selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QualityTier {
    #[serde(rename = "8k")]
    Uhd8k,
    #[serde(rename = "4k")]
    Uhd4k,
    #[serde(rename = "1440p")]
    P1440,
    #[default]
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "360p")]
    P360,
}

impl QualityTier {
    pub const ALL: [QualityTier; 7] = [
        QualityTier::Uhd8k,
        QualityTier::Uhd4k,
        QualityTier::P1440,
        QualityTier::P1080,
        QualityTier::P720,
        QualityTier::P480,
        QualityTier::P360,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QualityTier::Uhd8k => "8k",
            QualityTier::Uhd4k => "4k",
            QualityTier::P1440 => "1440p",
            QualityTier::P1080 => "1080p",
            QualityTier::P720 => "720p",
            QualityTier::P480 => "480p",
            QualityTier::P360 => "360p",
        }
    }

    /// Maximum pixel height for this tier.
    pub fn max_height(self) -> u32 {
        match self {
            QualityTier::Uhd8k => 4320,
            QualityTier::Uhd4k => 2160,
            QualityTier::P1440 => 1440,
            QualityTier::P1080 => 1080,
            QualityTier::P720 => 720,
            QualityTier::P480 => 480,
            QualityTier::P360 => 360,
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityTier {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        QualityTier::ALL
            .into_iter()
            .find(|q| q.as_str() == lower)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "quality",
                value: s.to_string(),
                expected: "8k, 4k, 1440p, 1080p, 720p, 480p, 360p",
            })
    }
}

/// Preferred video codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    Av1,
    #[default]
    H264,
    H265,
    Vp9,
}

impl VideoCodec {
    pub const ALL: [VideoCodec; 4] = [
        VideoCodec::Av1,
        VideoCodec::H264,
        VideoCodec::H265,
        VideoCodec::Vp9,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VideoCodec::Av1 => "av1",
            VideoCodec::H264 => "h264",
            VideoCodec::H265 => "h265",
            VideoCodec::Vp9 => "vp9",
        }
    }

    /// Codec identifier prefix as reported by the engine (`vcodec^=` filter).
    pub fn engine_tag(self) -> &'static str {
        match self {
            VideoCodec::Av1 => "av01",
            VideoCodec::H264 => "avc1",
            VideoCodec::H265 => "hev1",
            VideoCodec::Vp9 => "vp9",
        }
    }
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoCodec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        VideoCodec::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "codec",
                value: s.to_string(),
                expected: "av1, h264, h265, vp9",
            })
    }
}

/// Parses a codec preference where `any` means "no codec filtering".
pub fn parse_codec_preference(s: &str) -> Result<Option<VideoCodec>, ConfigError> {
    if s.trim().eq_ignore_ascii_case("any") {
        return Ok(None);
    }
    s.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
        field: "codec",
        value: s.to_string(),
        expected: "av1, h264, h265, vp9, any",
    })
}

/// Target audio bitrate in kbps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum AudioBitrate {
    K320,
    K256,
    #[default]
    K192,
    K128,
    K96,
}

impl AudioBitrate {
    pub const ALL: [AudioBitrate; 5] = [
        AudioBitrate::K320,
        AudioBitrate::K256,
        AudioBitrate::K192,
        AudioBitrate::K128,
        AudioBitrate::K96,
    ];

    pub fn kbps(self) -> u32 {
        match self {
            AudioBitrate::K320 => 320,
            AudioBitrate::K256 => 256,
            AudioBitrate::K192 => 192,
            AudioBitrate::K128 => 128,
            AudioBitrate::K96 => 96,
        }
    }

    fn invalid(value: impl Into<String>) -> ConfigError {
        ConfigError::InvalidValue {
            field: "audio bitrate",
            value: value.into(),
            expected: "320, 256, 192, 128, 96",
        }
    }
}

impl TryFrom<u32> for AudioBitrate {
    type Error = ConfigError;

    fn try_from(kbps: u32) -> Result<Self, Self::Error> {
        AudioBitrate::ALL
            .into_iter()
            .find(|b| b.kbps() == kbps)
            .ok_or_else(|| AudioBitrate::invalid(kbps.to_string()))
    }
}

impl From<AudioBitrate> for u32 {
    fn from(b: AudioBitrate) -> u32 {
        b.kbps()
    }
}

impl FromStr for AudioBitrate {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kbps: u32 = s.trim().parse().map_err(|_| AudioBitrate::invalid(s))?;
        AudioBitrate::try_from(kbps)
    }
}

impl fmt::Display for AudioBitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kbps())
    }
}

/// How outbound engine traffic is routed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Egress {
    #[default]
    Direct,
    Proxy(Url),
    /// Anonymized routing through the local Tor SOCKS endpoint.
    Tor,
}

impl Egress {
    /// Validates `raw` and wraps it as an explicit proxy.
    pub fn proxy(raw: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidProxy {
            value: raw.to_string(),
            source,
        })?;
        match url.scheme() {
            "http" | "https" | "socks4" | "socks4a" | "socks5" | "socks5h" => {
                Ok(Egress::Proxy(url))
            }
            other => Err(ConfigError::UnsupportedProxyScheme(other.to_string())),
        }
    }

    /// Proxy URL passed to the engine, if any. `tor_endpoint` is used for [`Egress::Tor`].
    pub fn proxy_url(&self, tor_endpoint: &str) -> Option<String> {
        match self {
            Egress::Direct => None,
            Egress::Proxy(url) => Some(url.as_str().trim_end_matches('/').to_string()),
            Egress::Tor => Some(tor_endpoint.to_string()),
        }
    }
}

/// Session cookies used to authenticate engine requests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Auth {
    #[default]
    None,
    BrowserCookies(String),
    CookieFile(PathBuf),
}

impl Auth {
    pub fn browser(name: &str) -> Result<Self, ConfigError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::EmptyBrowser);
        }
        Ok(Auth::BrowserCookies(name.to_ascii_lowercase()))
    }

    pub fn cookie_file(path: impl Into<PathBuf>) -> Self {
        Auth::CookieFile(path.into())
    }
}

/// Immutable record of user choices for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    pub quality: QualityTier,
    /// `None` disables codec filtering.
    pub video_codec: Option<VideoCodec>,
    pub audio_bitrate: AudioBitrate,
    pub output_dir: PathBuf,
    pub egress: Egress,
    pub auth: Auth,
    /// Container the engine merges/remuxes into.
    pub container: String,
    /// Local SOCKS endpoint used when `egress` is [`Egress::Tor`].
    pub tor_endpoint: String,
}

impl JobConfig {
    pub fn new(
        quality: QualityTier,
        video_codec: Option<VideoCodec>,
        audio_bitrate: AudioBitrate,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            quality,
            video_codec,
            audio_bitrate,
            output_dir: output_dir.into(),
            egress: Egress::Direct,
            auth: Auth::None,
            container: DEFAULT_CONTAINER.to_string(),
            tor_endpoint: DEFAULT_TOR_PROXY.to_string(),
        }
    }

    pub fn with_egress(mut self, egress: Egress) -> Self {
        self.egress = egress;
        self
    }

    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = container.into();
        self
    }

    pub fn with_tor_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.tor_endpoint = endpoint.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Codec label for display (`any` when unfiltered).
    pub fn codec_label(&self) -> &'static str {
        self.video_codec.map(VideoCodec::as_str).unwrap_or("any")
    }
}
