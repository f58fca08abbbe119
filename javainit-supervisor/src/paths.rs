use std::path::{Path, PathBuf};
use std::time::Duration;

pub const LAUNCHER_STATIC_FILE: &str = "service/bin/launcher-static.yml";
pub const LAUNCHER_CUSTOM_FILE: &str = "var/conf/launcher-custom.yml";
pub const OUTPUT_FILE: &str = "var/log/startup.log";
pub const PIDFILE: &str = "var/run/service.pid";

pub const STOP_TIMEOUT: Duration = Duration::from_secs(240);
pub const STOP_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Locations of the four files the supervisor works with.
///
/// Relative paths resolve against the invoking process's working directory and
/// are reported in messages exactly as configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorPaths {
    pub static_config: PathBuf,
    pub custom_config: PathBuf,
    pub output: PathBuf,
    pub pidfile: PathBuf,
}

impl Default for SupervisorPaths {
    fn default() -> Self {
        Self {
            static_config: PathBuf::from(LAUNCHER_STATIC_FILE),
            custom_config: PathBuf::from(LAUNCHER_CUSTOM_FILE),
            output: PathBuf::from(OUTPUT_FILE),
            pidfile: PathBuf::from(PIDFILE),
        }
    }
}

impl SupervisorPaths {
    /// The default layout rooted at `root` instead of the working directory.
    pub fn under(root: &Path) -> Self {
        Self {
            static_config: root.join(LAUNCHER_STATIC_FILE),
            custom_config: root.join(LAUNCHER_CUSTOM_FILE),
            output: root.join(OUTPUT_FILE),
            pidfile: root.join(PIDFILE),
        }
    }

    /// Advisory lock file guarding pidfile read-then-act sequences.
    pub fn lockfile(&self) -> PathBuf {
        let mut name = self.pidfile.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }
}

/// Process-wide settings for one supervisor invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorConfig {
    pub paths: SupervisorPaths,
    pub stop_timeout: Duration,
    pub poll_interval: Duration,
    /// Hold an exclusive advisory lock for the duration of `start`/`stop`.
    pub lock: bool,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self::with_paths(SupervisorPaths::default())
    }
}

impl SupervisorConfig {
    pub fn with_paths(paths: SupervisorPaths) -> Self {
        Self {
            paths,
            stop_timeout: STOP_TIMEOUT,
            poll_interval: STOP_POLL_INTERVAL,
            lock: false,
        }
    }
}
