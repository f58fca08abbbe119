//! OS process primitives: liveness probe, graceful termination, detached spawn.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::sleep;
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use javainit_config::LaunchCommand;

use crate::error::ProcessError;

/// Whether `pid` names a process on this host that we could manage.
///
/// Uses the signal-0 existence probe. Permission and lookup errors count as
/// "not alive". Pids that do not fit a positive `pid_t` are never alive, so
/// this can not end up probing a process group.
pub fn is_alive(pid: u32) -> bool {
    let Some(target) = to_pid(pid) else {
        return false;
    };
    match kill(target, None) {
        Ok(()) => !is_zombie(pid),
        Err(Errno::ESRCH) => false,
        Err(err) => {
            tracing::debug!(pid, error = %err, "liveness probe failed, treating as not running");
            false
        }
    }
}

/// Send SIGTERM to `pid`. A process that vanished first is not an error.
pub fn terminate(pid: u32) -> Result<(), ProcessError> {
    let target = to_pid(pid).ok_or(ProcessError::Signal {
        pid,
        source: Errno::EINVAL,
    })?;
    match kill(target, Signal::SIGTERM) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(source) => Err(ProcessError::Signal { pid, source }),
    }
}

/// Poll [`is_alive`] every `interval` until `pid` is gone or `timeout` elapses.
pub fn wait_for_exit(pid: u32, timeout: Duration, interval: Duration) -> Result<(), ProcessError> {
    let deadline = Instant::now() + timeout;
    loop {
        if !is_alive(pid) {
            return Ok(());
        }
        let now = Instant::now();
        if now >= deadline {
            return Err(ProcessError::TerminationTimeout { pid, timeout });
        }
        sleep(interval.min(deadline - now));
    }
}

fn to_pid(pid: u32) -> Option<Pid> {
    i32::try_from(pid)
        .ok()
        .filter(|raw| *raw > 0)
        .map(Pid::from_raw)
}

#[cfg(target_os = "linux")]
fn is_zombie(pid: u32) -> bool {
    let Ok(stat) = std::fs::read_to_string(format!("/proc/{pid}/stat")) else {
        return false;
    };
    // The state field follows the parenthesised command name, which may itself contain ')'.
    stat.rsplit_once(')')
        .and_then(|(_, rest)| rest.split_whitespace().next())
        == Some("Z")
}

#[cfg(not(target_os = "linux"))]
fn is_zombie(_pid: u32) -> bool {
    false
}

// ---------------------------------------------------------------------------
// Spawn
// ---------------------------------------------------------------------------

/// A freshly spawned child, held only until its pid is recorded.
#[derive(Debug)]
pub struct SupervisedProcess {
    child: Child,
    output: PathBuf,
}

impl SupervisedProcess {
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Release the handle. The child keeps running in its own session.
    pub fn detach(self) -> u32 {
        self.child.id()
    }

    /// Kill and reap the child.
    pub fn kill(mut self) {
        let pid = self.child.id();
        if let Err(err) = self.child.kill().and_then(|()| self.child.wait().map(drop)) {
            tracing::warn!(pid, error = %err, "failed to kill unrecorded child");
        }
    }
}

/// Spawn `command` in a new session with stdout and stderr appended to `output`.
pub fn spawn_detached(
    command: &LaunchCommand,
    output: &File,
    output_path: &Path,
) -> Result<SupervisedProcess, ProcessError> {
    let spawn_err = |source| ProcessError::SpawnFailed {
        program: command.executable.clone(),
        source,
    };

    let stdout = output.try_clone().map_err(spawn_err)?;
    let stderr = output.try_clone().map_err(spawn_err)?;

    let mut cmd = Command::new(&command.executable);
    cmd.args(&command.args)
        .env_clear()
        .envs(&command.env)
        .current_dir(&command.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr));

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // SAFETY: setsid is async-signal-safe and touches no parent state.
        unsafe {
            cmd.pre_exec(|| {
                nix::unistd::setsid()?;
                Ok(())
            });
        }
    }

    let child = cmd.spawn().map_err(spawn_err)?;
    Ok(SupervisedProcess {
        child,
        output: output_path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
