//! Parsing of the machine-readable progress lines requested from yt-dlp.
//!
//! Each line looks like `vidq-progress <status> <downloaded> <total> <estimate>`;
//! yt-dlp prints `NA` for fields it does not know. Estimates may be floats.

use crate::progress::ProgressEvent;

/// Prefix identifying our progress lines in the engine's stdout.
pub const PROGRESS_MARKER: &str = "vidq-progress";

pub(super) fn progress_template() -> String {
    format!(
        "download:{PROGRESS_MARKER} %(progress.status)s %(progress.downloaded_bytes)s \
         %(progress.total_bytes)s %(progress.total_bytes_estimate)s"
    )
}

fn parse_bytes(field: Option<&str>) -> Option<u64> {
    let field = field?;
    if let Ok(n) = field.parse::<u64>() {
        return Some(n);
    }
    match field.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 => Some(f.round() as u64),
        _ => None,
    }
}

/// Parses one stdout line; returns `None` for anything that is not a progress line.
pub fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    let mut fields = line.split_whitespace();
    if fields.next()? != PROGRESS_MARKER {
        return None;
    }
    let status = fields.next()?;
    let downloaded = parse_bytes(fields.next());
    let total = parse_bytes(fields.next());
    let estimate = parse_bytes(fields.next());
    let total = total.filter(|t| *t > 0).or(estimate).filter(|t| *t > 0);

    match status {
        "downloading" => Some(ProgressEvent::Downloading {
            total,
            downloaded: downloaded.unwrap_or(0),
        }),
        "finished" => Some(ProgressEvent::Finished { total }),
        _ => None,
    }
}
