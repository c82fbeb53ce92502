//! Ctrl-C handling for batch runs.
//!
//! The first Ctrl-C sets the [`StopToken`], so the queue stops before the next
//! item and the running download finishes its file. A second Ctrl-C exits at once.

use std::thread;
use vidq_core::control::StopToken;

/// Exit status for a run ended by a second Ctrl-C (128 + SIGINT).
const INTERRUPTED_EXIT: i32 = 130;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterruptAction {
    Stop,
    Exit,
}

/// What the `presses`-th Ctrl-C (1-based) does.
fn action_for(presses: usize) -> InterruptAction {
    if presses <= 1 {
        InterruptAction::Stop
    } else {
        InterruptAction::Exit
    }
}

/// Listens for Ctrl-C on a background thread and drives `stop`.
///
/// Failing to install the handler only loses the graceful stop; the run goes on.
pub fn spawn_interrupt_handler(stop: StopToken) {
    let spawned = thread::Builder::new()
        .name("vidq-interrupt".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(err) => {
                    tracing::warn!(error = %err, "cannot start signal runtime; Ctrl-C stops immediately");
                    return;
                }
            };
            runtime.block_on(async move {
                let mut presses = 0;
                loop {
                    if let Err(err) = tokio::signal::ctrl_c().await {
                        tracing::warn!(error = %err, "cannot listen for Ctrl-C");
                        return;
                    }
                    presses += 1;
                    match action_for(presses) {
                        InterruptAction::Stop => {
                            tracing::info!("stop requested by Ctrl-C");
                            eprintln!(
                                "\nStop requested: finishing the current video. Press Ctrl-C again to quit now."
                            );
                            stop.request_stop();
                        }
                        InterruptAction::Exit => {
                            tracing::warn!("second Ctrl-C, exiting");
                            std::process::exit(INTERRUPTED_EXIT);
                        }
                    }
                }
            });
        });
    if let Err(err) = spawned {
        tracing::warn!(error = %err, "cannot spawn interrupt thread");
    }
}
