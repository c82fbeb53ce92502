//! Per-item outcomes and the queue summary.

use std::fmt;

use crate::engine::EngineError;

/// Result of one `download_one` call.
#[derive(Debug)]
pub enum DownloadOutcome {
    Success { title: String },
    Failure { url: String, error: EngineError },
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Success { .. })
    }
}

/// How a queue run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStatus {
    /// Every entry was attempted.
    Completed,
    /// The queue file does not exist.
    Missing,
    /// The queue file exists but could not be read; see [`QueueSummary::queue_error`].
    Unreadable,
    /// The queue file has no usable lines.
    Empty,
    /// A stop was requested; remaining entries were skipped.
    Stopped,
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QueueStatus::Completed => "completed",
            QueueStatus::Missing => "queue file missing",
            QueueStatus::Unreadable => "queue file unreadable",
            QueueStatus::Empty => "queue empty",
            QueueStatus::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Aggregate counts for one queue run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub status: QueueStatus,
    /// Why the queue file could not be read, set with [`QueueStatus::Unreadable`].
    pub queue_error: Option<String>,
}

impl QueueSummary {
    pub(crate) fn nothing_to_do(status: QueueStatus) -> Self {
        Self {
            succeeded: 0,
            failed: 0,
            skipped: 0,
            status,
            queue_error: None,
        }
    }

    pub(crate) fn unreadable(error: String) -> Self {
        Self {
            queue_error: Some(error),
            ..Self::nothing_to_do(QueueStatus::Unreadable)
        }
    }

    /// `(succeeded, failed)` counts.
    pub fn tally(&self) -> (usize, usize) {
        (self.succeeded, self.failed)
    }

    pub(crate) fn record(&mut self, outcome: &DownloadOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}
