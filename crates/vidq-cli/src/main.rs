use std::process::ExitCode;

use vidq_core::logging;

mod cli;

use crate::cli::Cli;

fn main() -> ExitCode {
    // File logging under the XDG state dir; stderr if that is unavailable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    match Cli::run_from_args() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("vidq error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
