//! CLI for the vidq batch video downloader.

mod commands;

use anyhow::Result;
use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;
use std::process::ExitCode;
use vidq_core::config::{self, VidqConfig};
use vidq_core::job::{parse_codec_preference, AudioBitrate, Auth, Egress, JobConfig, QualityTier};
use vidq_core::scheduler::{QueueStatus, QueueSummary};

use commands::{
    print_banner, print_completions, print_config_summary, prompt_run_request, run_batch,
};

const AFTER_HELP: &str = "\
Examples:
  vidq                                   interactive mode
  vidq -q 4k -c av1 -a 320 -i downloadqueue.txt
  vidq --tor -i downloadqueue.txt
  vidq --proxy socks5://127.0.0.1:1080 -i downloadqueue.txt
  vidq --cookies-from-browser chrome -i downloadqueue.txt
  vidq --cookies cookies.txt -i downloadqueue.txt";

/// Top-level CLI. Flags override the defaults in `~/.config/vidq/config.toml`.
#[derive(Debug, Parser)]
#[command(name = "vidq", version)]
#[command(about = "vidq: download a queue of videos with a chosen quality, codec and bitrate")]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    /// Path to the download queue file (default: downloadqueue.txt).
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output directory for downloads (default: ./downloads).
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Video quality preset: 8k, 4k, 1440p, 1080p, 720p, 480p, 360p.
    #[arg(short, long, value_name = "QUALITY")]
    pub quality: Option<QualityTier>,

    /// Preferred video codec.
    #[arg(short, long, value_parser = ["av1", "h264", "h265", "vp9", "any"])]
    pub codec: Option<String>,

    /// Audio bitrate in kbps: 320, 256, 192, 128, 96.
    #[arg(short, long, value_name = "KBPS")]
    pub audio_bitrate: Option<AudioBitrate>,

    /// Proxy URL (e.g. socks5://127.0.0.1:1080).
    #[arg(long, value_name = "URL", conflicts_with = "tor")]
    pub proxy: Option<String>,

    /// Route traffic through the local Tor SOCKS endpoint.
    #[arg(long)]
    pub tor: bool,

    /// Extract cookies from a browser (chrome, firefox, edge, safari, ...).
    #[arg(long, value_name = "BROWSER", conflicts_with = "cookies")]
    pub cookies_from_browser: Option<String>,

    /// Path to a Netscape-format cookies.txt file.
    #[arg(long, value_name = "FILE")]
    pub cookies: Option<PathBuf>,

    /// Prompt for every setting before downloading.
    #[arg(long)]
    pub interactive: bool,

    /// Hide progress bars; per-item messages are still printed.
    #[arg(long)]
    pub quiet: bool,

    /// Exit with status 1 if any download failed or the queue is missing, unreadable or empty.
    #[arg(long)]
    pub strict: bool,

    /// Extraction engine binary (name on PATH or absolute path).
    #[arg(long, value_name = "PATH")]
    pub engine: Option<String>,

    /// Print shell completions and exit.
    #[arg(long, value_name = "SHELL", value_enum)]
    pub completions: Option<Shell>,
}

/// Everything a queue run needs: where the queue is and how to download it.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub queue_file: PathBuf,
    pub job: JobConfig,
}

impl Cli {
    pub fn run_from_args() -> Result<ExitCode> {
        let bare = std::env::args_os().len() <= 1;
        let cli = Cli::parse();

        if let Some(shell) = cli.completions {
            print_completions(shell);
            return Ok(ExitCode::SUCCESS);
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let request = if bare || cli.interactive {
            match prompt_run_request(&cfg)? {
                Some(request) => request,
                None => {
                    println!("Cancelled.");
                    return Ok(ExitCode::SUCCESS);
                }
            }
        } else {
            let request = cli.run_request(&cfg)?;
            print_banner();
            print_config_summary(&request.job, &request.queue_file);
            request
        };

        let binary = cli.engine.as_deref().unwrap_or(&cfg.engine.binary);
        let summary = run_batch(&request, binary, cli.quiet)?;
        if strict_failure(&summary, cli.strict) {
            Ok(ExitCode::FAILURE)
        } else {
            Ok(ExitCode::SUCCESS)
        }
    }

    /// Builds the run from config defaults overridden by flags.
    pub fn run_request(&self, cfg: &VidqConfig) -> Result<RunRequest> {
        let mut job = cfg.base_job()?;
        if let Some(quality) = self.quality {
            job.quality = quality;
        }
        if let Some(codec) = &self.codec {
            job.video_codec = parse_codec_preference(codec)?;
        }
        if let Some(bitrate) = self.audio_bitrate {
            job.audio_bitrate = bitrate;
        }
        if let Some(dir) = &self.output {
            job.output_dir = dir.clone();
        }

        let egress = match (&self.proxy, self.tor) {
            (_, true) => Egress::Tor,
            (Some(proxy), false) => Egress::proxy(proxy)?,
            (None, false) => Egress::Direct,
        };
        let auth = match (&self.cookies_from_browser, &self.cookies) {
            (Some(browser), _) => Auth::browser(browser)?,
            (None, Some(path)) => Auth::cookie_file(path),
            (None, None) => Auth::None,
        };

        Ok(RunRequest {
            queue_file: self.input.clone().unwrap_or_else(|| cfg.queue_file.clone()),
            job: job.with_egress(egress).with_auth(auth),
        })
    }
}

/// Per-item failures exit 0 unless `strict` is set.
pub fn strict_failure(summary: &QueueSummary, strict: bool) -> bool {
    let clean = summary.failed == 0
        && !matches!(
            summary.status,
            QueueStatus::Missing | QueueStatus::Unreadable | QueueStatus::Empty
        );
    strict && !clean
}

#[cfg(test)]
mod tests;
