//! Pidfile persistence.
//!
//! The pidfile holds a single decimal pid. Writes go through a `.tmp` sibling
//! followed by `rename`, so a concurrent reader sees either the old pid or the
//! new one, never a partial write.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::PidfileError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PidfileStore {
    path: PathBuf,
}

impl PidfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the recorded pid.
    ///
    /// Returns `PidfileError::NotFound` if there is no pidfile. Surrounding
    /// whitespace (a trailing newline, say) is tolerated.
    pub fn read(&self) -> Result<u32, PidfileError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| {
            let path = self.path.clone();
            if source.kind() == ErrorKind::NotFound {
                PidfileError::NotFound { path, source }
            } else {
                PidfileError::Read { path, source }
            }
        })?;
        contents
            .trim()
            .parse::<u32>()
            .map_err(|_| PidfileError::Malformed {
                path: self.path.clone(),
                contents,
            })
    }

    /// Record `pid`, creating parent directories as needed.
    pub fn write(&self, pid: u32) -> Result<(), PidfileError> {
        let write_err = |source| PidfileError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let tmp = self.tmp_path();
        fs::write(&tmp, pid.to_string()).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)
    }

    /// Delete the pidfile. Already absent counts as success.
    pub fn remove(&self) -> Result<(), PidfileError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PidfileError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
