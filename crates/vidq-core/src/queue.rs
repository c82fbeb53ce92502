//! Queue file reading.
//!
//! One URL per line; surrounding whitespace is trimmed, blank lines and lines
//! starting with `#` are skipped. Order and duplicates are preserved.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default queue file name used by the CLI.
pub const DEFAULT_QUEUE_FILE: &str = "downloadqueue.txt";

/// One URL with its 1-based position among the usable queue lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub position: usize,
    pub url: String,
}

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read queue file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Parses queue text into entries.
pub fn parse_queue(text: &str) -> Vec<QueueEntry> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .enumerate()
        .map(|(i, url)| QueueEntry {
            position: i + 1,
            url: url.to_string(),
        })
        .collect()
}

/// Reads and parses the queue file at `path` in one pass.
pub fn read_queue(path: &Path) -> Result<Vec<QueueEntry>, QueueError> {
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => QueueError::NotFound(path.to_path_buf()),
        _ => QueueError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let entries = parse_queue(&text);
    tracing::debug!(path = %path.display(), count = entries.len(), "parsed queue file");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn urls(entries: &[QueueEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.url.as_str()).collect()
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let text = ["", "  ", "# comment", "https://a", "https://b  ", "#x"].join("\n");
        let entries = parse_queue(&text);
        assert_eq!(urls(&entries), vec!["https://a", "https://b"]);
        assert_eq!(entries[0].position, 1);
        assert_eq!(entries[1].position, 2);
    }

    #[test]
    fn indented_comment_is_skipped() {
        let entries = parse_queue("   # indented\nhttps://a\n");
        assert_eq!(urls(&entries), vec!["https://a"]);
    }

    #[test]
    fn keeps_duplicates_in_order() {
        let entries = parse_queue("https://b\nhttps://a\nhttps://b\r\n");
        assert_eq!(urls(&entries), vec!["https://b", "https://a", "https://b"]);
    }

    #[test]
    fn read_queue_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_queue(&dir.path().join("nonexistent.txt")).unwrap_err();
        assert!(matches!(err, QueueError::NotFound(_)));
    }

    #[test]
    fn read_queue_is_repeatable() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "# videos").unwrap();
        writeln!(f, "https://example.com/watch?v=1").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "https://example.com/watch?v=2").unwrap();
        f.flush().unwrap();

        let first = read_queue(f.path()).unwrap();
        let second = read_queue(f.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
