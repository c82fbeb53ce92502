//! RAII scope that owns the progress state of one download.

use super::{ProgressEvent, ProgressReporter, ProgressState};

/// Clears the reporter when dropped, on success, failure or unwind.
pub struct ProgressScope<'a> {
    reporter: &'a mut dyn ProgressReporter,
    state: ProgressState,
}

impl<'a> ProgressScope<'a> {
    pub fn open(reporter: &'a mut dyn ProgressReporter, label: &str) -> Self {
        reporter.begin(label);
        Self {
            reporter,
            state: ProgressState::default(),
        }
    }

    pub fn set_label(&mut self, label: &str) {
        self.reporter.set_label(label);
    }

    pub fn apply(&mut self, event: ProgressEvent) {
        self.state.apply(event);
        self.reporter.render(&self.state);
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }
}

impl Drop for ProgressScope<'_> {
    fn drop(&mut self) {
        self.reporter.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentReporter;

    #[test]
    fn drop_clears_reporter() {
        let mut reporter = SilentReporter::new();
        {
            let mut scope = ProgressScope::open(&mut reporter, "clip");
            scope.apply(ProgressEvent::Downloading {
                total: Some(10),
                downloaded: 5,
            });
            assert_eq!(scope.state().downloaded_bytes, 5);
        }
        assert!(!reporter.is_active());
        assert!(reporter.last_state().is_none());
    }

    #[test]
    fn scope_without_events_still_clears() {
        let mut reporter = SilentReporter::new();
        drop(ProgressScope::open(&mut reporter, "instant failure"));
        assert!(!reporter.is_active());
    }
}
