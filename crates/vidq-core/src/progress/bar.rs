//! Terminal reporter backed by indicatif.
//!
//! Shows a byte bar with ETA when the total is known and a spinner with a
//! running byte count otherwise. Console messages go to stdout.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

use super::{ProgressReporter, ProgressState};
use crate::queue::QueueEntry;
use crate::scheduler::DownloadOutcome;

const SIZED_TEMPLATE: &str =
    "{spinner:.green} {msg:.cyan} [{bar:40.green/blue}] {percent:>3}% {bytes}/{total_bytes} {eta}";
const UNSIZED_TEMPLATE: &str = "{spinner:.green} {msg:.cyan} {bytes} ({bytes_per_sec})";
const LABEL_MAX_CHARS: usize = 50;
const TICK_MS: u64 = 120;

pub struct BarReporter {
    bar: Option<ProgressBar>,
    draw: bool,
    sized: bool,
}

impl BarReporter {
    /// `draw = false` keeps console messages but hides the bar (e.g. `--quiet`).
    pub fn new(draw: bool) -> Self {
        Self {
            bar: None,
            draw,
            sized: false,
        }
    }

    fn sized_style() -> ProgressStyle {
        ProgressStyle::with_template(SIZED_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
    }

    fn unsized_style() -> ProgressStyle {
        ProgressStyle::with_template(UNSIZED_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn println(&self, line: &str) {
        match &self.bar {
            Some(bar) if !bar.is_hidden() => bar.println(line),
            _ => println!("{line}"),
        }
    }
}

fn short_label(label: &str) -> String {
    let mut short: String = label.chars().take(LABEL_MAX_CHARS).collect();
    if label.chars().count() > LABEL_MAX_CHARS {
        short.push_str("...");
    }
    short
}

impl ProgressReporter for BarReporter {
    fn begin(&mut self, label: &str) {
        self.clear();
        let bar = if self.draw {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr())
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(Self::unsized_style());
        bar.set_message(short_label(label));
        if self.draw {
            bar.enable_steady_tick(Duration::from_millis(TICK_MS));
        }
        self.sized = false;
        self.bar = Some(bar);
    }

    fn set_label(&mut self, label: &str) {
        self.println(&format!("Downloading: {label}"));
        if let Some(bar) = &self.bar {
            bar.set_message(short_label(label));
        }
    }

    fn render(&mut self, state: &ProgressState) {
        let Some(bar) = &self.bar else {
            return;
        };
        match state.total_bytes {
            Some(total) => {
                if !self.sized {
                    bar.set_style(Self::sized_style());
                    self.sized = true;
                }
                if bar.length() != Some(total) {
                    bar.set_length(total);
                }
            }
            None => {
                if self.sized {
                    bar.set_style(Self::unsized_style());
                    bar.unset_length();
                    self.sized = false;
                }
            }
        }
        bar.set_position(state.downloaded_bytes);
    }

    fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        self.sized = false;
    }

    fn is_active(&self) -> bool {
        self.bar.is_some()
    }

    fn announce_queue(&mut self, count: usize) {
        println!("\nFound {count} video(s) in queue");
    }

    fn announce_item(&mut self, entry: &QueueEntry, total: usize) {
        println!("\nVideo {}/{}", entry.position, total);
    }

    fn announce_outcome(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Success { title } => {
                println!("✓ Successfully downloaded: {title}");
            }
            DownloadOutcome::Failure { url, error } => {
                eprintln!("✗ Error downloading {url}: {error}");
            }
        }
    }
}
