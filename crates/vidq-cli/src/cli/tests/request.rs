//! Building the run request from config defaults and flags, and the exit status.

use super::parse;
use crate::cli::strict_failure;
use std::path::PathBuf;
use vidq_core::config::VidqConfig;
use vidq_core::job::{AudioBitrate, Auth, Egress, QualityTier, VideoCodec};
use vidq_core::scheduler::{QueueStatus, QueueSummary};

#[test]
fn request_uses_config_defaults() {
    let request = parse(&["vidq", "--quiet"])
        .run_request(&VidqConfig::default())
        .unwrap();
    assert_eq!(request.queue_file, PathBuf::from("downloadqueue.txt"));
    assert_eq!(request.job.quality, QualityTier::P1080);
    assert_eq!(request.job.video_codec, Some(VideoCodec::H264));
    assert_eq!(request.job.audio_bitrate, AudioBitrate::K192);
    assert_eq!(request.job.output_dir, PathBuf::from("./downloads"));
    assert_eq!(request.job.egress, Egress::Direct);
    assert_eq!(request.job.auth, Auth::None);
}

#[test]
fn flags_override_config() {
    let cfg = VidqConfig {
        quality: QualityTier::P480,
        codec: "vp9".into(),
        ..VidqConfig::default()
    };
    let request = parse(&["vidq", "-q", "8k", "-c", "any", "-a", "256", "-i", "q.txt", "-o", "out"])
        .run_request(&cfg)
        .unwrap();
    assert_eq!(request.queue_file, PathBuf::from("q.txt"));
    assert_eq!(request.job.quality, QualityTier::Uhd8k);
    assert_eq!(request.job.video_codec, None);
    assert_eq!(request.job.audio_bitrate, AudioBitrate::K256);
    assert_eq!(request.job.output_dir, PathBuf::from("out"));
}

#[test]
fn config_values_survive_without_flags() {
    let cfg = VidqConfig {
        quality: QualityTier::P720,
        codec: "h265".into(),
        queue_file: "mine.txt".into(),
        ..VidqConfig::default()
    };
    let request = parse(&["vidq", "--strict"]).run_request(&cfg).unwrap();
    assert_eq!(request.queue_file, PathBuf::from("mine.txt"));
    assert_eq!(request.job.quality, QualityTier::P720);
    assert_eq!(request.job.video_codec, Some(VideoCodec::H265));
}

#[test]
fn egress_and_auth_from_flags() {
    let cfg = VidqConfig::default();

    let tor = parse(&["vidq", "--tor", "--cookies-from-browser", "Chrome"])
        .run_request(&cfg)
        .unwrap();
    assert_eq!(tor.job.egress, Egress::Tor);
    assert_eq!(tor.job.auth, Auth::BrowserCookies("chrome".into()));

    let proxied = parse(&["vidq", "--proxy", "socks5://127.0.0.1:1080", "--cookies", "c.txt"])
        .run_request(&cfg)
        .unwrap();
    assert_eq!(
        proxied.job.egress.proxy_url(&proxied.job.tor_endpoint).as_deref(),
        Some("socks5://127.0.0.1:1080")
    );
    assert_eq!(proxied.job.auth, Auth::CookieFile("c.txt".into()));
}

#[test]
fn invalid_proxy_is_a_setup_error() {
    let cfg = VidqConfig::default();
    assert!(parse(&["vidq", "--proxy", "not a url"]).run_request(&cfg).is_err());
    assert!(parse(&["vidq", "--proxy", "ftp://host:21"]).run_request(&cfg).is_err());
}

fn summary(succeeded: usize, failed: usize, status: QueueStatus) -> QueueSummary {
    QueueSummary {
        succeeded,
        failed,
        skipped: 0,
        status,
        queue_error: None,
    }
}

#[test]
fn exit_status_is_zero_unless_strict() {
    let with_failures = summary(2, 1, QueueStatus::Completed);
    assert!(!strict_failure(&with_failures, false));
    assert!(strict_failure(&with_failures, true));

    let clean = summary(3, 0, QueueStatus::Completed);
    assert!(!strict_failure(&clean, true));

    let stopped = summary(1, 0, QueueStatus::Stopped);
    assert!(!strict_failure(&stopped, true));

    for status in [QueueStatus::Missing, QueueStatus::Unreadable, QueueStatus::Empty] {
        assert!(!strict_failure(&summary(0, 0, status), false));
        assert!(strict_failure(&summary(0, 0, status), true));
    }
}
