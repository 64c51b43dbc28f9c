//! Fully downloaded staging file awaiting placement.

use std::io;
use std::path::Path;
use tempfile::TempPath;

/// A verified download sitting in its staging file.
///
/// Dropping it deletes the staging file, so an artifact that is never placed
/// leaves nothing behind.
#[derive(Debug)]
pub struct TemporaryArtifact {
    temp: TempPath,
    size: u64,
    checksum: Option<String>,
}

impl TemporaryArtifact {
    pub(super) fn new(temp: TempPath, size: u64, checksum: Option<String>) -> Self {
        Self {
            temp,
            size,
            checksum,
        }
    }

    pub fn path(&self) -> &Path {
        &self.temp
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Hex MD5 of the downloaded bytes, when computed.
    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    /// Atomically rename the staging file onto `final_path`, replacing whatever is
    /// there. Fails if `final_path` is on a different filesystem; on failure the
    /// staging file is deleted before returning.
    pub fn place(self, final_path: &Path) -> io::Result<()> {
        self.temp.persist(final_path).map_err(|e| {
            // Dropping the returned TempPath removes the staging file.
            drop(e.path);
            e.error
        })
    }
}
