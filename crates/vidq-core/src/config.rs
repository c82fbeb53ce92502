use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::DEFAULT_BINARY;
use crate::job::{
    parse_codec_preference, AudioBitrate, ConfigError, JobConfig, QualityTier, DEFAULT_CONTAINER,
    DEFAULT_TOR_PROXY,
};
use crate::queue::DEFAULT_QUEUE_FILE;

/// Extraction engine settings (optional `[engine]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine binary name on PATH or absolute path.
    pub binary: String,
    /// Container the engine merges and remuxes into.
    pub container: String,
    /// SOCKS endpoint used for `--tor`.
    pub tor_proxy: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            container: DEFAULT_CONTAINER.to_string(),
            tor_proxy: DEFAULT_TOR_PROXY.to_string(),
        }
    }
}

/// Global defaults loaded from `~/.config/vidq/config.toml`. CLI flags override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VidqConfig {
    pub quality: QualityTier,
    /// Codec preference: av1, h264, h265, vp9 or "any".
    pub codec: String,
    pub audio_bitrate: AudioBitrate,
    pub output_dir: PathBuf,
    pub queue_file: PathBuf,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Default for VidqConfig {
    fn default() -> Self {
        Self {
            quality: QualityTier::default(),
            codec: "h264".to_string(),
            audio_bitrate: AudioBitrate::default(),
            output_dir: PathBuf::from("./downloads"),
            queue_file: PathBuf::from(DEFAULT_QUEUE_FILE),
            engine: EngineConfig::default(),
        }
    }
}

impl VidqConfig {
    /// Job configuration from these defaults: direct egress, no cookies.
    pub fn base_job(&self) -> Result<JobConfig, ConfigError> {
        let codec = parse_codec_preference(&self.codec)?;
        Ok(
            JobConfig::new(self.quality, codec, self.audio_bitrate, &self.output_dir)
                .with_container(&self.engine.container)
                .with_tor_endpoint(&self.engine.tor_proxy),
        )
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vidq")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from `path`, creating a default file if none exists.
pub fn load_or_init_at(path: &Path) -> Result<VidqConfig> {
    if !path.exists() {
        let default_cfg = VidqConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)
            .with_context(|| format!("failed to write default config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let cfg: VidqConfig =
        toml::from_str(&data).with_context(|| format!("invalid config: {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration from the XDG config dir, creating a default file if none exists.
pub fn load_or_init() -> Result<VidqConfig> {
    load_or_init_at(&config_path()?)
}
