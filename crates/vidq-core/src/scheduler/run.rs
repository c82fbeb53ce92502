//! Download orchestration: one URL at a time, in queue order.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::outcome::{DownloadOutcome, QueueStatus, QueueSummary};
use crate::control::StopToken;
use crate::engine::{Engine, EngineError, EngineOptions};
use crate::job::JobConfig;
use crate::progress::{ProgressEvent, ProgressReporter, ProgressScope};
use crate::queue::{self, QueueError};

/// Creates the output directory once, before any download writes into it.
pub fn prepare_output_dir(config: &JobConfig) -> Result<()> {
    let dir = config.output_dir();
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory: {}", dir.display()))?;
    Ok(())
}

/// Drives the engine over a queue and reports progress.
pub struct Downloader<E, R> {
    engine: E,
    reporter: R,
    stop: Option<StopToken>,
}

impl<E: Engine, R: ProgressReporter> Downloader<E, R> {
    pub fn new(engine: E, reporter: R) -> Self {
        Self {
            engine,
            reporter,
            stop: None,
        }
    }

    /// Checks `stop` before each queue item.
    pub fn with_stop_token(mut self, stop: StopToken) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Downloads a single URL. Failures are logged and returned, never raised.
    pub fn download_one(&mut self, config: &JobConfig, url: &str) -> DownloadOutcome {
        let opts = EngineOptions::from_config(config);
        let result = {
            let mut scope = ProgressScope::open(&mut self.reporter, url);
            let result = fetch(&self.engine, url, &opts, &mut scope);
            tracing::debug!(url, fraction = ?scope.state().fraction(), "progress at end of download");
            result
        };

        let outcome = match result {
            Ok(title) => {
                tracing::info!(url, title = %title, "download succeeded");
                DownloadOutcome::Success { title }
            }
            Err(error) => {
                tracing::error!(url, error = %error, "download failed");
                DownloadOutcome::Failure {
                    url: url.to_string(),
                    error,
                }
            }
        };
        self.reporter.announce_outcome(&outcome);
        outcome
    }

    /// Downloads every URL in the queue file at `queue_path`, strictly in order.
    ///
    /// A missing, unreadable or empty queue is not an error: the summary is
    /// `(0, 0)` with status [`QueueStatus::Missing`], [`QueueStatus::Unreadable`]
    /// or [`QueueStatus::Empty`].
    pub fn download_queue(&mut self, config: &JobConfig, queue_path: &Path) -> QueueSummary {
        let entries = match queue::read_queue(queue_path) {
            Ok(entries) => entries,
            Err(QueueError::NotFound(path)) => {
                tracing::warn!(path = %path.display(), "queue file not found");
                return QueueSummary::nothing_to_do(QueueStatus::Missing);
            }
            Err(err) => {
                tracing::error!(error = %err, "could not read queue file");
                return QueueSummary::unreadable(err.to_string());
            }
        };

        if entries.is_empty() {
            tracing::warn!(path = %queue_path.display(), "no URLs found in queue file");
            return QueueSummary::nothing_to_do(QueueStatus::Empty);
        }

        let total = entries.len();
        tracing::info!(
            total,
            quality = %config.quality,
            codec = config.codec_label(),
            audio_kbps = config.audio_bitrate.kbps(),
            "starting queue"
        );
        self.reporter.announce_queue(total);

        let mut summary = QueueSummary::nothing_to_do(QueueStatus::Completed);
        for (done, entry) in entries.iter().enumerate() {
            if self.stop.as_ref().is_some_and(StopToken::is_stop_requested) {
                summary.skipped = total - done;
                summary.status = QueueStatus::Stopped;
                tracing::info!(skipped = summary.skipped, "stop requested; leaving remaining entries");
                break;
            }
            self.reporter.announce_item(entry, total);
            let outcome = self.download_one(config, &entry.url);
            summary.record(&outcome);
        }

        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            "queue finished"
        );
        summary
    }
}

/// Probe then retrieve, feeding progress into `scope`. Returns the display title.
fn fetch<E: Engine>(
    engine: &E,
    url: &str,
    opts: &EngineOptions,
    scope: &mut ProgressScope<'_>,
) -> Result<String, EngineError> {
    let info = engine.probe(url, opts)?;
    let title = info.display_title().to_string();
    scope.set_label(&title);
    engine.retrieve(url, opts, &mut |event: ProgressEvent| scope.apply(event))?;
    Ok(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MediaInfo;
    use crate::job::{AudioBitrate, QualityTier, VideoCodec};
    use crate::progress::SilentReporter;
    use std::cell::RefCell;

    /// Engine whose retrieval fails for URLs containing "bad".
    #[derive(Default)]
    struct ScriptedEngine {
        calls: RefCell<Vec<String>>,
    }

    impl Engine for ScriptedEngine {
        fn probe(&self, url: &str, _opts: &EngineOptions) -> Result<MediaInfo, EngineError> {
            Ok(MediaInfo {
                title: Some(format!("title of {url}")),
                ..MediaInfo::default()
            })
        }

        fn retrieve(
            &self,
            url: &str,
            _opts: &EngineOptions,
            on_progress: &mut dyn FnMut(ProgressEvent),
        ) -> Result<(), EngineError> {
            self.calls.borrow_mut().push(url.to_string());
            on_progress(ProgressEvent::Downloading {
                total: Some(100),
                downloaded: 50,
            });
            if url.contains("bad") {
                return Err(EngineError::Extraction {
                    message: "Requested format is not available".into(),
                });
            }
            on_progress(ProgressEvent::Finished { total: Some(100) });
            Ok(())
        }
    }

    fn config(dir: &Path) -> JobConfig {
        JobConfig::new(
            QualityTier::P1080,
            Some(VideoCodec::H264),
            AudioBitrate::K192,
            dir,
        )
    }

    #[test]
    fn download_one_success_returns_title_and_clears_progress() {
        let dir = tempfile::tempdir().unwrap();
        let mut downloader = Downloader::new(ScriptedEngine::default(), SilentReporter::new());
        let outcome = downloader.download_one(&config(dir.path()), "https://ok/1");
        match outcome {
            DownloadOutcome::Success { title } => assert_eq!(title, "title of https://ok/1"),
            other => panic!("expected success, got {other:?}"),
        }
        assert!(!downloader.reporter().is_active());
        assert!(downloader.reporter().last_state().is_none());
        assert_eq!(*downloader.engine().calls.borrow(), vec!["https://ok/1"]);
    }

    #[test]
    fn download_one_failure_is_captured() {
        let dir = tempfile::tempdir().unwrap();
        let mut downloader = Downloader::new(ScriptedEngine::default(), SilentReporter::new());
        let outcome = downloader.download_one(&config(dir.path()), "https://bad/1");
        match outcome {
            DownloadOutcome::Failure { url, error } => {
                assert_eq!(url, "https://bad/1");
                assert!(matches!(error, EngineError::Extraction { .. }));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(!downloader.reporter().is_active());
    }

    #[test]
    fn prepare_output_dir_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a").join("b");
        prepare_output_dir(&config(&out)).unwrap();
        assert!(out.is_dir());
        // Idempotent.
        prepare_output_dir(&config(&out)).unwrap();
    }
}
