//! Progress reporting for the active download.
//!
//! The engine emits [`ProgressEvent`]s; a [`ProgressScope`] folds them into a
//! [`ProgressState`] and forwards each update to a [`ProgressReporter`]. A
//! scope lives for exactly one `download_one` call and clears the reporter
//! when dropped.

mod bar;
mod scope;

pub use bar::BarReporter;
pub use scope::ProgressScope;

use crate::queue::QueueEntry;
use crate::scheduler::DownloadOutcome;

/// Progress event emitted by the engine for the active download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    Downloading {
        total: Option<u64>,
        downloaded: u64,
    },
    Finished {
        total: Option<u64>,
    },
}

/// Byte counters for one active download.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    /// Total size, `None` while unknown. Never `Some(0)`.
    pub total_bytes: Option<u64>,
    pub downloaded_bytes: u64,
    pub finished: bool,
}

impl ProgressState {
    pub fn apply(&mut self, event: ProgressEvent) {
        match event {
            ProgressEvent::Downloading { total, downloaded } => {
                self.total_bytes = known_total(total);
                self.downloaded_bytes = downloaded;
                self.finished = false;
            }
            ProgressEvent::Finished { total } => {
                if let Some(total) = known_total(total) {
                    self.total_bytes = Some(total);
                    self.downloaded_bytes = total;
                }
                self.finished = true;
            }
        }
    }

    /// Fraction complete in [0.0, 1.0], `None` when the total is unknown.
    pub fn fraction(&self) -> Option<f64> {
        let total = self.total_bytes?;
        Some((self.downloaded_bytes as f64 / total as f64).min(1.0))
    }
}

fn known_total(total: Option<u64>) -> Option<u64> {
    total.filter(|t| *t > 0)
}

/// Display adapter for download progress and per-item console messages.
///
/// `begin`/`render`/`clear` manage the single visible indicator; the
/// `announce_*` hooks default to no-ops.
pub trait ProgressReporter {
    /// Shows a fresh indicator labelled `label`.
    fn begin(&mut self, label: &str);

    /// Updates the indicator label (e.g. once the title is known).
    fn set_label(&mut self, label: &str);

    fn render(&mut self, state: &ProgressState);

    /// Removes the indicator. Must be safe to call when nothing is active.
    fn clear(&mut self);

    fn is_active(&self) -> bool;

    fn announce_queue(&mut self, _count: usize) {}

    fn announce_item(&mut self, _entry: &QueueEntry, _total: usize) {}

    fn announce_outcome(&mut self, _outcome: &DownloadOutcome) {}
}

/// Reporter that draws nothing and only tracks whether an indicator is active.
#[derive(Debug, Default)]
pub struct SilentReporter {
    active: bool,
    last: Option<ProgressState>,
}

impl SilentReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last rendered state of the active indicator.
    pub fn last_state(&self) -> Option<&ProgressState> {
        self.last.as_ref()
    }
}

impl ProgressReporter for SilentReporter {
    fn begin(&mut self, _label: &str) {
        self.active = true;
        self.last = None;
    }

    fn set_label(&mut self, _label: &str) {}

    fn render(&mut self, state: &ProgressState) {
        self.last = Some(state.clone());
    }

    fn clear(&mut self) {
        self.active = false;
        self.last = None;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
