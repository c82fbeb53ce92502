//! CLI command handlers.

mod completions;
mod interactive;
mod interrupt;
mod run;
mod summary;

pub use completions::print_completions;
pub use interactive::prompt_run_request;
pub use run::run_batch;
pub use summary::{print_banner, print_config_summary};
