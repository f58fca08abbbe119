//! `javainit start`: launch the service unless it is already running.

use std::process::ExitCode;

use anyhow::{Context, Result};

use javainit_supervisor::{StartOutcome, Supervisor, EXIT_FAILURE};

pub fn run(supervisor: &Supervisor) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("failed to determine working directory")?;

    match supervisor.start(&cwd) {
        Ok(StartOutcome::AlreadyRunning { pid }) => {
            tracing::debug!(pid, "start is a no-op");
            Ok(ExitCode::SUCCESS)
        }
        Ok(StartOutcome::Launched { pid }) => {
            tracing::debug!(pid, "start launched process");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("failed to start process: {err}");
            Ok(ExitCode::from(EXIT_FAILURE))
        }
    }
}
