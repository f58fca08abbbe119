//! The start/status/stop state machine.
//!
//! State is derived from the pidfile on every call, never stored:
//!
//! ```text
//! no pidfile ──────────────► start: launch     status: 3   stop: 0
//! pidfile, process gone ───► start: relaunch   status: 1   stop: remove, 0
//! pidfile, process alive ──► start: no-op      status: 0   stop: SIGTERM + wait
//! ```
//!
//! This module owns the exit-code contract; callers only forward
//! [`StartOutcome`], [`Status`] and [`StopOutcome`] (or the error) to the shell.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use javainit_config::{command, loader, LaunchContext};

use crate::error::{output_err, PidfileError, SupervisorError};
use crate::lock::{self, PidfileLock};
use crate::paths::SupervisorConfig;
use crate::pidfile::PidfileStore;
use crate::process;

/// Exit code for a failed `start` or `stop`.
pub const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    AlreadyRunning { pid: u32 },
    Launched { pid: u32 },
}

#[derive(Debug)]
pub enum Status {
    Running { pid: u32 },
    NotRunning { pid: u32 },
    /// The pidfile is missing or could not be read.
    Unknown(PidfileError),
}

impl Status {
    pub fn exit_code(&self) -> u8 {
        match self {
            Status::Running { .. } => 0,
            Status::NotRunning { .. } => 1,
            Status::Unknown(_) => 3,
        }
    }

    /// Text for stderr; `None` means healthy and silent.
    pub fn message(&self) -> Option<String> {
        match self {
            Status::Running { .. } => None,
            Status::NotRunning { .. } => {
                Some("pidfile exists but process is not running".to_string())
            }
            Status::Unknown(err) => Some(format!("failed to read pidfile: {err}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// There was no pidfile.
    NotRunning,
    /// The pidfile named a dead process and was removed.
    RemovedStale { pid: u32 },
    Stopped { pid: u32 },
}

#[derive(Debug, Clone)]
pub struct Supervisor {
    config: SupervisorConfig,
    pidfile: PidfileStore,
}

impl Supervisor {
    pub fn new(config: SupervisorConfig) -> Self {
        let pidfile = PidfileStore::new(&config.paths.pidfile);
        Self { config, pidfile }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn pidfile(&self) -> &PidfileStore {
        &self.pidfile
    }

    // -----------------------------------------------------------------------
    // start
    // -----------------------------------------------------------------------

    /// Launch the service unless the pidfile already names a live process.
    ///
    /// Never launches a second copy of a live process. Success means the spawn
    /// call succeeded and the pid was recorded, not that the service is healthy.
    ///
    /// The child's environment is captured from this process only once a
    /// launch is actually needed; `cwd` is the directory relative descriptor
    /// paths resolve against.
    pub fn start(&self, cwd: &Path) -> Result<StartOutcome, SupervisorError> {
        let _lock = self.lock()?;

        match self.pidfile.read() {
            Ok(pid) if process::is_alive(pid) => {
                tracing::debug!(pid, "process already running");
                return Ok(StartOutcome::AlreadyRunning { pid });
            }
            Ok(pid) => {
                tracing::info!(pid, "removing stale pidfile");
                self.pidfile
                    .remove()
                    .map_err(SupervisorError::UpdatePidfile)?;
            }
            Err(PidfileError::NotFound { .. }) => {}
            Err(err) => return Err(SupervisorError::ReadPidfile(err)),
        }

        let paths = &self.config.paths;
        let descriptor = loader::load(&paths.static_config, &paths.custom_config)?;
        let ctx = LaunchContext::from_process(cwd.to_path_buf());
        let launch = command::build(&descriptor, &ctx);

        for dir in launch.resolve_dirs(&descriptor) {
            fs::create_dir_all(&dir)
                .map_err(|source| SupervisorError::CreateDir { path: dir, source })?;
        }

        let mut output = open_output(&paths.output)?;
        output
            .write_all(launch.header().as_bytes())
            .map_err(|e| output_err(&paths.output, e))?;

        let child = match process::spawn_detached(&launch, &output, &paths.output) {
            Ok(child) => child,
            Err(err) => {
                // Close out the header so the log does not suggest a running service.
                if let Err(write_err) = writeln!(output, "Failed to start process: {err}") {
                    tracing::warn!(error = %write_err, "failed to record spawn failure");
                }
                return Err(SupervisorError::Process(err));
            }
        };
        let pid = child.pid();

        if let Err(err) = self.pidfile.write(pid) {
            // An unrecorded child could never be stopped by us.
            child.kill();
            return Err(SupervisorError::UpdatePidfile(err));
        }

        tracing::info!(
            pid,
            main_class = %descriptor.main_class,
            output = %child.output().display(),
            "launched process"
        );
        Ok(StartOutcome::Launched { pid: child.detach() })
    }

    // -----------------------------------------------------------------------
    // status
    // -----------------------------------------------------------------------

    pub fn status(&self) -> Status {
        match self.pidfile.read() {
            Ok(pid) if process::is_alive(pid) => Status::Running { pid },
            Ok(pid) => Status::NotRunning { pid },
            Err(err) => Status::Unknown(err),
        }
    }

    // -----------------------------------------------------------------------
    // stop
    // -----------------------------------------------------------------------

    /// SIGTERM the recorded process and wait up to the stop timeout.
    ///
    /// On timeout the pidfile is kept, since the process is still real, and a
    /// later `stop` can retry. The process is never force-killed.
    pub fn stop(&self) -> Result<StopOutcome, SupervisorError> {
        let _lock = self.lock()?;

        let pid = match self.pidfile.read() {
            Ok(pid) => pid,
            Err(PidfileError::NotFound { .. }) => return Ok(StopOutcome::NotRunning),
            Err(err) => return Err(SupervisorError::ReadPidfile(err)),
        };

        if !process::is_alive(pid) {
            tracing::info!(pid, "removing stale pidfile");
            self.pidfile
                .remove()
                .map_err(SupervisorError::UpdatePidfile)?;
            return Ok(StopOutcome::RemovedStale { pid });
        }

        tracing::info!(pid, "sending SIGTERM");
        process::terminate(pid).map_err(SupervisorError::Process)?;
        process::wait_for_exit(pid, self.config.stop_timeout, self.config.poll_interval)
            .map_err(SupervisorError::WaitForStop)?;

        self.pidfile
            .remove()
            .map_err(SupervisorError::UpdatePidfile)?;
        tracing::info!(pid, "process stopped");
        Ok(StopOutcome::Stopped { pid })
    }

    fn lock(&self) -> Result<Option<PidfileLock>, SupervisorError> {
        if !self.config.lock {
            return Ok(None);
        }
        lock::acquire(&self.config.paths.lockfile()).map(Some)
    }
}

fn open_output(path: &Path) -> Result<File, SupervisorError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| output_err(parent, e))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| output_err(path, e))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
