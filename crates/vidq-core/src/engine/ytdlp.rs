//! [`Engine`] implementation that runs the yt-dlp binary as a child process.

use std::io::{BufRead, BufReader, Read};
#[cfg(unix)]
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use super::classify::classify_failure;
use super::progress_line::parse_progress_line;
use super::{Engine, EngineError, EngineOptions, MediaInfo};
use crate::progress::ProgressEvent;

/// Default engine binary name looked up on PATH.
pub const DEFAULT_BINARY: &str = "yt-dlp";

#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
}

impl YtDlp {
    /// Uses `binary` as given, without checking that it exists.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Resolves `binary` (a name on PATH or a path) to an executable.
    pub fn locate(binary: &str) -> Result<Self, EngineError> {
        let path =
            which::which(binary).map_err(|_| EngineError::NotInstalled(binary.to_string()))?;
        tracing::debug!(path = %path.display(), "located extraction engine");
        Ok(Self::new(path))
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.stdin(Stdio::null());
        // Own process group: a terminal Ctrl-C stops the queue between items
        // instead of killing the engine mid-download.
        #[cfg(unix)]
        cmd.process_group(0);
        cmd
    }
}

/// Reads engine stdout to EOF. Lines are decoded lossily: titles and paths
/// are not guaranteed to be UTF-8, and stopping early would close the pipe
/// under a running engine.
fn drain_stdout(stdout: impl Read, on_progress: &mut dyn FnMut(ProgressEvent)) {
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => {
                tracing::warn!(error = %err, "reading engine output failed");
                break;
            }
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end();
        match parse_progress_line(line) {
            Some(event) => on_progress(event),
            None if !line.is_empty() => tracing::debug!(target: "vidq::engine", "{}", line),
            None => {}
        }
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY)
    }
}

impl Engine for YtDlp {
    fn probe(&self, url: &str, opts: &EngineOptions) -> Result<MediaInfo, EngineError> {
        tracing::debug!(url, "probing metadata");
        let output = self
            .command()
            .args(opts.probe_args(url))
            .output()
            .map_err(EngineError::Spawn)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(&stderr, output.status.code()));
        }
        let info: MediaInfo = serde_json::from_slice(&output.stdout)?;
        Ok(info)
    }

    fn retrieve(
        &self,
        url: &str,
        opts: &EngineOptions,
        on_progress: &mut dyn FnMut(ProgressEvent),
    ) -> Result<(), EngineError> {
        tracing::debug!(url, format = %opts.format, "starting retrieval");
        let mut child = self
            .command()
            .args(opts.retrieve_args(url))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(EngineError::Spawn)?;

        // Drain stderr on a helper thread so a chatty engine cannot block on a full pipe.
        let stderr_handle = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                if let Err(err) = stderr.read_to_end(&mut buf) {
                    tracing::debug!(error = %err, "engine stderr read stopped early");
                }
                String::from_utf8_lossy(&buf).into_owned()
            })
        });

        if let Some(stdout) = child.stdout.take() {
            drain_stdout(stdout, on_progress);
        }

        let status = child.wait().map_err(EngineError::Spawn)?;
        let stderr = stderr_handle
            .and_then(|h| h.join().ok())
            .unwrap_or_default();

        if status.success() {
            Ok(())
        } else {
            Err(classify_failure(&stderr, status.code()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_missing_binary_is_not_installed() {
        let err = YtDlp::locate("vidq-definitely-not-an-engine").unwrap_err();
        assert!(matches!(err, EngineError::NotInstalled(name) if name == "vidq-definitely-not-an-engine"));
    }

    #[test]
    fn stdout_drain_survives_invalid_utf8() {
        let output: &[u8] = b"[download] Destination: Caf\xe9.mp4\n\
            vidq-progress downloading 10 100 NA\n\
            \xff\xfe\n\
            vidq-progress finished 100 100 NA\r\n";
        let mut events = Vec::new();
        drain_stdout(output, &mut |e: ProgressEvent| events.push(e));
        assert_eq!(
            events,
            vec![
                ProgressEvent::Downloading {
                    total: Some(100),
                    downloaded: 10
                },
                ProgressEvent::Finished { total: Some(100) },
            ]
        );
    }

    #[test]
    fn spawn_failure_is_reported() {
        let engine = YtDlp::new("/nonexistent/vidq/yt-dlp");
        let opts = EngineOptions::from_config(&crate::job::JobConfig::new(
            crate::job::QualityTier::P360,
            None,
            crate::job::AudioBitrate::K96,
            "out",
        ));
        let err = engine.probe("https://example.com", &opts).unwrap_err();
        assert!(matches!(err, EngineError::Spawn(_)));
    }
}
