use crate::error::{Result, VolumizerError};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Single-instance guard backed by a PID file.
///
/// The file is created exclusively on [`acquire`](PidLock::acquire) and removed when
/// the guard is dropped.
#[derive(Debug)]
pub struct PidLock {
    path: PathBuf,
}

impl PidLock {
    pub fn acquire(path: &Path) -> Result<Self> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => {
                    VolumizerError::Lock(format!("{} already exists", path.display()))
                }
                _ => VolumizerError::Lock(format!(
                    "failed to write PID file {}: {}",
                    path.display(),
                    e
                )),
            })?;

        let lock = Self {
            path: path.to_path_buf(),
        };
        write!(file, "{}", std::process::id()).map_err(|e| {
            VolumizerError::Lock(format!(
                "failed to write PID file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(lock)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to remove PID file");
        }
    }
}
