//! Classify engine stderr into [`EngineError`] kinds.

use super::EngineError;

/// Stderr fragments that indicate the output path could not be written.
const WRITE_MARKERS: &[&str] = &[
    "unable to open for writing",
    "unable to create directory",
    "permission denied",
    "no space left on device",
    "read-only file system",
];

/// The most useful line of engine stderr: the last `ERROR:` line, else the last non-empty line.
fn summary_line(stderr: &str) -> Option<&str> {
    let lines = || stderr.lines().map(str::trim).filter(|l| !l.is_empty());
    lines()
        .filter(|l| l.starts_with("ERROR:"))
        .last()
        .map(|l| l.trim_start_matches("ERROR:").trim())
        .or_else(|| lines().last())
}

/// Maps a failed engine run to an error. `exit_code` is used when stderr is empty.
pub fn classify_failure(stderr: &str, exit_code: Option<i32>) -> EngineError {
    let message = match summary_line(stderr) {
        Some(line) => line.to_string(),
        None => match exit_code {
            Some(code) => format!("engine exited with status {code}"),
            None => "engine terminated by signal".to_string(),
        },
    };
    let lower = stderr.to_ascii_lowercase();
    if WRITE_MARKERS.iter().any(|m| lower.contains(m)) {
        EngineError::Write { message }
    } else {
        EngineError::Extraction { message }
    }
}
