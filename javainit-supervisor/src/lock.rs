//! Optional advisory lock serialising `start`/`stop` across invocations.
//!
//! Without it two concurrent `start`s can both observe "not running" and both
//! spawn. The lock lives next to the pidfile and is released on drop.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use nix::fcntl::{Flock, FlockArg};

use crate::error::SupervisorError;

pub struct PidfileLock {
    _guard: Flock<File>,
}

/// Block until an exclusive `flock` on `path` is held.
pub fn acquire(path: &Path) -> Result<PidfileLock, SupervisorError> {
    let lock_err = |source| SupervisorError::Lock {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(lock_err)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)
        .map_err(lock_err)?;
    let guard = Flock::lock(file, FlockArg::LockExclusive)
        .map_err(|(_, errno)| lock_err(errno.into()))?;
    tracing::debug!(path = %path.display(), "acquired pidfile lock");
    Ok(PidfileLock { _guard: guard })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn second_nonblocking_lock_fails_while_held() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("run").join("service.pid.lock");
        let held = acquire(&path).expect("acquire");

        let other = File::open(&path).expect("open lockfile");
        assert!(Flock::lock(other, FlockArg::LockExclusiveNonblock).is_err());

        drop(held);
        let other = File::open(&path).expect("reopen lockfile");
        assert!(Flock::lock(other, FlockArg::LockExclusiveNonblock).is_ok());
    }
}
