//! Interactive mode: ask for every setting, show the summary, confirm.

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::path::PathBuf;
use vidq_core::config::VidqConfig;
use vidq_core::job::{AudioBitrate, Auth, Egress, QualityTier, VideoCodec};

use super::summary::{print_banner, print_config_summary};
use crate::cli::RunRequest;

const BROWSERS: &str = "chrome, firefox, edge, safari, opera, brave, chromium";

fn codec_choices() -> Vec<Option<VideoCodec>> {
    VideoCodec::ALL.into_iter().map(Some).chain([None]).collect()
}

fn codec_name(codec: Option<VideoCodec>) -> &'static str {
    codec.map(VideoCodec::as_str).unwrap_or("any")
}

/// Returns `None` if the user declines to start.
pub fn prompt_run_request(cfg: &VidqConfig) -> Result<Option<RunRequest>> {
    let theme = ColorfulTheme::default();
    let base = cfg.base_job()?;

    print_banner();
    println!("Welcome to interactive mode!\n");

    let queue_file: String = Input::with_theme(&theme)
        .with_prompt("Enter path to download queue file")
        .default(cfg.queue_file.display().to_string())
        .interact_text()?;

    let qualities = QualityTier::ALL;
    let quality_idx = Select::with_theme(&theme)
        .with_prompt("Select quality")
        .items(&qualities)
        .default(qualities.iter().position(|q| *q == base.quality).unwrap_or(0))
        .interact()?;

    let codecs = codec_choices();
    let codec_labels: Vec<&str> = codecs.iter().map(|c| codec_name(*c)).collect();
    let codec_idx = Select::with_theme(&theme)
        .with_prompt("Select video codec")
        .items(&codec_labels)
        .default(codecs.iter().position(|c| *c == base.video_codec).unwrap_or(0))
        .interact()?;

    let bitrates = AudioBitrate::ALL;
    let bitrate_labels: Vec<String> = bitrates.iter().map(|b| format!("{b} kbps")).collect();
    let bitrate_idx = Select::with_theme(&theme)
        .with_prompt("Select audio bitrate")
        .items(&bitrate_labels)
        .default(bitrates.iter().position(|b| *b == base.audio_bitrate).unwrap_or(0))
        .interact()?;

    let output_dir: String = Input::with_theme(&theme)
        .with_prompt("Enter output directory")
        .default(base.output_dir.display().to_string())
        .interact_text()?;

    let egress = prompt_egress(&theme, &base.tor_endpoint)?;
    let auth = prompt_auth(&theme)?;

    let mut job = base.with_egress(egress).with_auth(auth);
    job.quality = qualities[quality_idx];
    job.video_codec = codecs[codec_idx];
    job.audio_bitrate = bitrates[bitrate_idx];
    job.output_dir = PathBuf::from(output_dir);

    let queue_file = PathBuf::from(queue_file);
    print_config_summary(&job, &queue_file);

    let start = Confirm::with_theme(&theme)
        .with_prompt("Start downloading?")
        .default(true)
        .interact()?;
    Ok(start.then_some(RunRequest { queue_file, job }))
}

fn prompt_egress(theme: &ColorfulTheme, tor_endpoint: &str) -> Result<Egress> {
    let use_proxy = Confirm::with_theme(theme)
        .with_prompt("Use proxy/tunneling?")
        .default(false)
        .interact()?;
    if !use_proxy {
        return Ok(Egress::Direct);
    }

    let use_tor = Confirm::with_theme(theme)
        .with_prompt(format!("Use Tor ({tor_endpoint})?"))
        .default(false)
        .interact()?;
    if use_tor {
        return Ok(Egress::Tor);
    }

    let proxy: String = Input::with_theme(theme)
        .with_prompt("Enter proxy URL (e.g. socks5://127.0.0.1:1080)")
        .validate_with(|raw: &String| -> Result<(), String> {
            Egress::proxy(raw).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()?;
    Ok(Egress::proxy(&proxy)?)
}

fn prompt_auth(theme: &ColorfulTheme) -> Result<Auth> {
    let use_cookies = Confirm::with_theme(theme)
        .with_prompt("Use cookies to bypass bot detection?")
        .default(false)
        .interact()?;
    if !use_cookies {
        return Ok(Auth::None);
    }

    let options = ["Extract from browser", "Use cookies.txt file"];
    let choice = Select::with_theme(theme)
        .with_prompt("Cookie source")
        .items(&options)
        .default(0)
        .interact()?;

    if choice == 0 {
        let browser: String = Input::with_theme(theme)
            .with_prompt(format!("Enter browser name ({BROWSERS})"))
            .default("chrome".into())
            .validate_with(|raw: &String| -> Result<(), String> {
                Auth::browser(raw).map(|_| ()).map_err(|e| e.to_string())
            })
            .interact_text()?;
        Ok(Auth::browser(&browser)?)
    } else {
        let path: String = Input::with_theme(theme)
            .with_prompt("Enter path to cookies.txt file")
            .default("cookies.txt".into())
            .interact_text()?;
        Ok(Auth::cookie_file(path))
    }
}
