pub mod config;
pub mod logging;

pub mod control;
pub mod engine;
pub mod format;
pub mod job;
pub mod progress;
pub mod queue;
pub mod scheduler;
