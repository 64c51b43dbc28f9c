//! Parent directory creation for materialized files.

use crate::error::MaterializeError;
use std::fs;
use std::io;
use std::path::Path;
#[cfg(unix)]
use std::os::unix::fs::DirBuilderExt;

/// Default mode for created directories (subject to the process umask).
pub const DEFAULT_DIR_MODE: u32 = 0o777;

#[derive(Debug, Clone, Copy)]
pub struct DirectoryEnsurer {
    mode: u32,
}

impl Default for DirectoryEnsurer {
    fn default() -> Self {
        Self::new(DEFAULT_DIR_MODE)
    }
}

impl DirectoryEnsurer {
    pub fn new(mode: u32) -> Self {
        Self { mode }
    }

    /// Makes sure the parent directory of `local_path` exists, creating it and
    /// any missing ancestors. A no-op when the parent is already a directory.
    pub fn ensure_parent(&self, local_path: &Path) -> Result<(), MaterializeError> {
        let dir = match local_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => {
                return Err(MaterializeError::Directory {
                    dir: local_path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::InvalidInput, "path has no parent directory"),
                })
            }
        };

        match fs::metadata(dir) {
            Ok(meta) if meta.is_dir() => return Ok(()),
            Ok(_) => {
                return Err(MaterializeError::Directory {
                    dir: dir.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::AlreadyExists, "exists but is not a directory"),
                })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(MaterializeError::Directory {
                    dir: dir.to_path_buf(),
                    source: e,
                })
            }
        }

        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(self.mode);
        builder.create(dir).map_err(|source| MaterializeError::Directory {
            dir: dir.to_path_buf(),
            source,
        })?;
        let mode = format!("{:o}", self.mode);
        tracing::debug!(dir = %dir.display(), mode = %mode, "created directory");
        Ok(())
    }
}
