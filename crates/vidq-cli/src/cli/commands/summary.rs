//! Banner, configuration table and end-of-run summary.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use std::path::Path;
use vidq_core::job::{Auth, Egress, JobConfig};
use vidq_core::scheduler::{QueueStatus, QueueSummary};

pub fn print_banner() {
    println!(
        "vidq {}: download videos in multiple formats and qualities\n",
        env!("CARGO_PKG_VERSION")
    );
}

fn table(header: [&str; 2]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

/// Setting/value rows describing `job`.
pub fn config_rows(job: &JobConfig) -> Vec<(&'static str, String)> {
    let proxy = match &job.egress {
        Egress::Direct => "None".to_string(),
        Egress::Proxy(_) => job.egress.proxy_url(&job.tor_endpoint).unwrap_or_default(),
        Egress::Tor => format!("Tor ({})", job.tor_endpoint),
    };
    let cookies = match &job.auth {
        Auth::None => "None".to_string(),
        Auth::BrowserCookies(browser) => format!("From browser: {browser}"),
        Auth::CookieFile(path) => format!("From file: {}", path.display()),
    };
    vec![
        ("Quality", job.quality.to_string()),
        ("Video Codec", job.codec_label().to_string()),
        ("Audio Bitrate", format!("{} kbps", job.audio_bitrate.kbps())),
        ("Output Directory", job.output_dir.display().to_string()),
        ("Proxy", proxy),
        ("Cookies", cookies),
    ]
}

pub fn print_config_summary(job: &JobConfig, queue_file: &Path) {
    let mut table = table(["Setting", "Value"]);
    table.add_row(vec![
        Cell::new("Queue File"),
        Cell::new(queue_file.display()),
    ]);
    for (setting, value) in config_rows(job) {
        table.add_row(vec![Cell::new(setting), Cell::new(value)]);
    }
    println!("Download Configuration\n{table}\n");
}

/// The line printed to stderr ahead of the summary table, if any.
fn status_message(summary: &QueueSummary, queue_file: &Path) -> Option<String> {
    match summary.status {
        QueueStatus::Missing => Some(format!(
            "Error: Queue file '{}' not found.",
            queue_file.display()
        )),
        QueueStatus::Unreadable => Some(format!(
            "Error: cannot read queue file: {}",
            summary.queue_error.as_deref().unwrap_or("unknown error")
        )),
        QueueStatus::Empty => Some("Warning: No URLs found in queue file.".to_string()),
        QueueStatus::Stopped => Some(format!(
            "Stopped: {} video(s) not attempted.",
            summary.skipped
        )),
        QueueStatus::Completed => None,
    }
}

pub fn print_final_summary(summary: &QueueSummary, queue_file: &Path, output_dir: &Path) {
    if let Some(message) = status_message(summary, queue_file) {
        eprintln!("{message}");
    }

    let mut table = table(["Summary", ""]);
    table.add_row(vec![
        Cell::new("✓ Successful"),
        Cell::new(summary.succeeded),
    ]);
    table.add_row(vec![Cell::new("✗ Failed"), Cell::new(summary.failed)]);
    if summary.skipped > 0 {
        table.add_row(vec![Cell::new("Skipped"), Cell::new(summary.skipped)]);
    }
    table.add_row(vec![Cell::new("Output"), Cell::new(output_dir.display())]);
    println!("\nDownload Complete!\n{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidq_core::job::{AudioBitrate, QualityTier, VideoCodec};

    fn value<'a>(rows: &'a [(&'static str, String)], key: &str) -> &'a str {
        rows.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn rows_for_defaults() {
        let job = JobConfig::new(
            QualityTier::P1080,
            Some(VideoCodec::H264),
            AudioBitrate::K192,
            "./downloads",
        );
        let rows = config_rows(&job);
        assert_eq!(value(&rows, "Quality"), "1080p");
        assert_eq!(value(&rows, "Video Codec"), "h264");
        assert_eq!(value(&rows, "Audio Bitrate"), "192 kbps");
        assert_eq!(value(&rows, "Output Directory"), "./downloads");
        assert_eq!(value(&rows, "Proxy"), "None");
        assert_eq!(value(&rows, "Cookies"), "None");
    }

    #[test]
    fn rows_for_tor_and_browser_cookies() {
        let job = JobConfig::new(QualityTier::Uhd4k, None, AudioBitrate::K320, "out")
            .with_egress(Egress::Tor)
            .with_auth(Auth::browser("Firefox").unwrap());
        let rows = config_rows(&job);
        assert_eq!(value(&rows, "Video Codec"), "any");
        assert_eq!(value(&rows, "Proxy"), "Tor (socks5://127.0.0.1:9050)");
        assert_eq!(value(&rows, "Cookies"), "From browser: firefox");
    }

    #[test]
    fn rows_for_explicit_proxy_and_cookie_file() {
        let job = JobConfig::new(QualityTier::P720, None, AudioBitrate::K96, "out")
            .with_egress(Egress::proxy("socks5://127.0.0.1:1080").unwrap())
            .with_auth(Auth::cookie_file("cookies.txt"));
        let rows = config_rows(&job);
        assert_eq!(value(&rows, "Proxy"), "socks5://127.0.0.1:1080");
        assert_eq!(value(&rows, "Cookies"), "From file: cookies.txt");
    }

    #[test]
    fn unreadable_queue_reports_the_read_error() {
        let summary = QueueSummary {
            succeeded: 0,
            failed: 0,
            skipped: 0,
            status: QueueStatus::Unreadable,
            queue_error: Some("failed to read queue file q: Is a directory (os error 21)".into()),
        };
        let message = status_message(&summary, Path::new("q")).unwrap();
        assert!(message.starts_with("Error: cannot read queue file:"), "{message}");
        assert!(message.contains("Is a directory"), "{message}");
        assert!(!message.contains("not found"), "{message}");
    }

    #[test]
    fn completed_queue_has_no_status_line() {
        let summary = QueueSummary {
            succeeded: 2,
            failed: 0,
            skipped: 0,
            status: QueueStatus::Completed,
            queue_error: None,
        };
        assert_eq!(status_message(&summary, Path::new("q")), None);
    }
}
