use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Pidfile read/write failures.
///
/// I/O variants render as `<op> <path>: <cause>`, where the cause is the OS
/// description in lower case without the `(os error N)` suffix, e.g.
/// `open var/run/service.pid: no such file or directory`.
#[derive(Debug, Error)]
pub enum PidfileError {
    /// The pidfile does not exist; an expected outcome for `start` and `stop`.
    #[error("open {path}: {}", os_cause(.source))]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("open {path}: {}", os_cause(.source))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write {path}: {}", os_cause(.source))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("remove {path}: {}", os_cause(.source))]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} does not contain a valid pid: {contents:?}")]
    Malformed { path: PathBuf, contents: String },
}

/// Failures talking to the supervised process.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn {program}: {source}")]
    SpawnFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to signal process with pid '{pid}': {source}")]
    Signal {
        pid: u32,
        #[source]
        source: nix::Error,
    },

    #[error("process with pid '{pid}' did not stop within {} seconds", .timeout.as_secs())]
    TerminationTimeout { pid: u32, timeout: Duration },
}

/// Error surface of the start/stop verbs.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("failed to read pidfile: {0}")]
    ReadPidfile(#[source] PidfileError),

    #[error("failed to update pidfile: {0}")]
    UpdatePidfile(#[source] PidfileError),

    #[error("failed to load launcher config: {0}")]
    Config(#[from] javainit_config::ConfigError),

    #[error("failed to open output file {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to lock {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Process(ProcessError),

    #[error("failed to wait for process to stop: {0}")]
    WaitForStop(#[source] ProcessError),
}

pub(crate) fn output_err(path: impl Into<PathBuf>, source: std::io::Error) -> SupervisorError {
    SupervisorError::Output {
        path: path.into(),
        source,
    }
}

/// OS error description without the `(os error N)` suffix, first letter lowered.
pub(crate) fn os_cause(err: &io::Error) -> String {
    let text = err.to_string();
    let suffix = err.raw_os_error().map(|code| format!(" (os error {code})"));
    let detail = suffix
        .as_deref()
        .and_then(|suffix| text.strip_suffix(suffix))
        .unwrap_or(&text);
    let mut chars = detail.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::STOP_TIMEOUT;

    #[test]
    fn os_cause_drops_code_and_lowers_first_letter() {
        let err = io::Error::from_raw_os_error(2);
        assert_eq!(os_cause(&err), "no such file or directory");
    }

    #[test]
    fn os_cause_keeps_custom_messages() {
        let err = io::Error::other("Disk on fire");
        assert_eq!(os_cause(&err), "disk on fire");
    }

    #[test]
    fn not_found_renders_open_path_and_cause() {
        let err = PidfileError::NotFound {
            path: PathBuf::from("var/run/service.pid"),
            source: io::Error::from_raw_os_error(2),
        };
        assert_eq!(
            err.to_string(),
            "open var/run/service.pid: no such file or directory"
        );
        assert_eq!(
            SupervisorError::ReadPidfile(err).to_string(),
            "failed to read pidfile: open var/run/service.pid: no such file or directory"
        );
    }

    #[test]
    fn termination_timeout_reports_default_timeout_in_seconds() {
        let err = ProcessError::TerminationTimeout {
            pid: 4242,
            timeout: STOP_TIMEOUT,
        };
        assert_eq!(
            err.to_string(),
            "process with pid '4242' did not stop within 240 seconds"
        );
    }
}
