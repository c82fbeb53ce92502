//! Job scheduler.
//!
//! Processes the queue strictly sequentially: probe → retrieve → record, one
//! URL fully resolved before the next begins. Per-item failures are recorded
//! and never abort the batch.

mod outcome;
mod run;

pub use outcome::{DownloadOutcome, QueueStatus, QueueSummary};
pub use run::{prepare_output_dir, Downloader};
