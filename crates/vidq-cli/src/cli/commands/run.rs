//! Batch run: set up the engine and output directory, then work through the queue.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use vidq_core::control::StopToken;
use vidq_core::engine::{is_netscape_cookie_file, YtDlp};
use vidq_core::job::Auth;
use vidq_core::progress::BarReporter;
use vidq_core::scheduler::{prepare_output_dir, Downloader, QueueSummary};

use super::interrupt::spawn_interrupt_handler;
use super::summary::print_final_summary;
use crate::cli::RunRequest;

/// Warns (without failing) when the cookie file is unreadable or not a Netscape jar.
fn check_cookie_file(path: &Path) {
    match fs::read_to_string(path) {
        Ok(content) if is_netscape_cookie_file(&content) => {
            tracing::debug!(path = %path.display(), "cookie file looks valid");
        }
        Ok(_) => {
            tracing::warn!(path = %path.display(), "cookie file is not in Netscape format");
            eprintln!(
                "Warning: '{}' does not look like a Netscape cookies.txt file.",
                path.display()
            );
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "cannot read cookie file");
            eprintln!("Warning: cannot read cookie file '{}': {err}", path.display());
        }
    }
}

pub fn run_batch(request: &RunRequest, engine_binary: &str, quiet: bool) -> Result<QueueSummary> {
    let job = &request.job;
    if let Auth::CookieFile(path) = &job.auth {
        check_cookie_file(path);
    }

    prepare_output_dir(job)?;
    let engine = YtDlp::locate(engine_binary)
        .with_context(|| format!("install {engine_binary} or pass --engine PATH"))?;
    tracing::info!(engine = %engine.binary().display(), "using extraction engine");

    let stop = StopToken::new();
    spawn_interrupt_handler(stop.clone());
    let mut downloader =
        Downloader::new(engine, BarReporter::new(!quiet)).with_stop_token(stop);
    let summary = downloader.download_queue(job, &request.queue_file);
    print_final_summary(&summary, &request.queue_file, job.output_dir());
    Ok(summary)
}
