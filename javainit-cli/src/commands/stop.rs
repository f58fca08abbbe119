//! `javainit stop`: SIGTERM the recorded process and wait for it to exit.

use std::process::ExitCode;

use javainit_supervisor::{StopOutcome, Supervisor, EXIT_FAILURE};

pub fn run(supervisor: &Supervisor) -> ExitCode {
    match supervisor.stop() {
        Ok(StopOutcome::NotRunning) => ExitCode::SUCCESS,
        Ok(StopOutcome::RemovedStale { pid } | StopOutcome::Stopped { pid }) => {
            tracing::debug!(pid, "stop complete");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to stop process: {err}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
