//! `javainit status`: report liveness through the exit code.

use std::process::ExitCode;

use javainit_supervisor::Supervisor;

pub fn run(supervisor: &Supervisor) -> ExitCode {
    let status = supervisor.status();
    if let Some(message) = status.message() {
        eprintln!("{message}");
    }
    ExitCode::from(status.exit_code())
}
