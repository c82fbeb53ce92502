//! Scripted engine and recording reporter for scheduler tests.
//!
//! Each retrieval pops the next scripted result; every call is recorded so
//! tests can assert on invocation count and order.

use std::cell::RefCell;
use std::collections::VecDeque;

use vidq_core::control::StopToken;
use vidq_core::engine::{Engine, EngineError, EngineOptions, MediaInfo};
use vidq_core::progress::{ProgressEvent, ProgressReporter, ProgressState};
use vidq_core::queue::QueueEntry;
use vidq_core::scheduler::DownloadOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Succeed,
    FailProbe,
    FailRetrieve,
}

#[derive(Default)]
pub struct StubEngine {
    pub steps: RefCell<VecDeque<Step>>,
    pub probes: RefCell<Vec<String>>,
    pub retrievals: RefCell<Vec<String>>,
    pub last_format: RefCell<Option<String>>,
    /// Set while a retrieval is running, as a Ctrl-C mid-download would.
    pub stop_during_retrieval: Option<StopToken>,
}

impl StubEngine {
    pub fn scripted(steps: &[Step]) -> Self {
        Self {
            steps: RefCell::new(steps.iter().copied().collect()),
            ..Self::default()
        }
    }

    fn current(&self) -> Step {
        self.steps.borrow().front().copied().unwrap_or(Step::Succeed)
    }

    fn advance(&self) {
        self.steps.borrow_mut().pop_front();
    }

    /// URLs the engine was invoked for (one per download attempt), in order.
    pub fn invocations(&self) -> Vec<String> {
        self.probes.borrow().clone()
    }
}

impl Engine for StubEngine {
    fn probe(&self, url: &str, opts: &EngineOptions) -> Result<MediaInfo, EngineError> {
        self.probes.borrow_mut().push(url.to_string());
        *self.last_format.borrow_mut() = Some(opts.format.as_str().to_string());
        if self.current() == Step::FailProbe {
            self.advance();
            return Err(EngineError::Extraction {
                message: format!("Unsupported URL: {url}"),
            });
        }
        Ok(MediaInfo {
            title: Some(format!("Video at {url}")),
            ..MediaInfo::default()
        })
    }

    fn retrieve(
        &self,
        url: &str,
        _opts: &EngineOptions,
        on_progress: &mut dyn FnMut(ProgressEvent),
    ) -> Result<(), EngineError> {
        self.retrievals.borrow_mut().push(url.to_string());
        if let Some(stop) = &self.stop_during_retrieval {
            stop.request_stop();
        }
        let step = self.current();
        self.advance();
        on_progress(ProgressEvent::Downloading {
            total: None,
            downloaded: 0,
        });
        on_progress(ProgressEvent::Downloading {
            total: Some(1_000),
            downloaded: 400,
        });
        match step {
            Step::FailRetrieve => Err(EngineError::Write {
                message: "unable to open for writing".into(),
            }),
            _ => {
                on_progress(ProgressEvent::Finished { total: Some(1_000) });
                Ok(())
            }
        }
    }
}

/// Reporter that records every call.
#[derive(Default)]
pub struct RecordingReporter {
    pub active: bool,
    pub begun: usize,
    pub cleared: usize,
    pub labels: Vec<String>,
    pub rendered: Vec<ProgressState>,
    pub announced_items: Vec<(usize, usize)>,
    pub outcomes: Vec<bool>,
}

impl ProgressReporter for RecordingReporter {
    fn begin(&mut self, label: &str) {
        self.active = true;
        self.begun += 1;
        self.labels.push(label.to_string());
    }

    fn set_label(&mut self, label: &str) {
        self.labels.push(label.to_string());
    }

    fn render(&mut self, state: &ProgressState) {
        self.rendered.push(state.clone());
    }

    fn clear(&mut self) {
        self.active = false;
        self.cleared += 1;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn announce_item(&mut self, entry: &QueueEntry, total: usize) {
        self.announced_items.push((entry.position, total));
    }

    fn announce_outcome(&mut self, outcome: &DownloadOutcome) {
        self.outcomes.push(outcome.is_success());
    }
}
