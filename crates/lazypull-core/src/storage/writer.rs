//! Sequential writer for a staging file.

use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use super::artifact::TemporaryArtifact;
use super::{TEMP_PREFIX, TEMP_SUFFIX};

/// Freshly allocated staging file. Never reused across requests; deleted on drop
/// unless turned into a `TemporaryArtifact` and placed.
pub struct StagingWriter {
    file: NamedTempFile,
    written: u64,
    file_mode: u32,
}

impl StagingWriter {
    /// Create a new uniquely named staging file in `dir`.
    /// `file_mode` is applied when the artifact is finished, before placement.
    pub fn create_in(dir: &Path, file_mode: u32) -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(dir)?;
        Ok(Self {
            file,
            written: 0,
            file_mode,
        })
    }

    /// Append `data` to the file.
    pub fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Flush and sync the data, set final permissions and close the handle.
    pub fn finish(mut self, checksum: Option<String>) -> io::Result<TemporaryArtifact> {
        self.file.flush()?;
        self.file.as_file().sync_all()?;
        #[cfg(unix)]
        self.file
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(self.file_mode))?;
        Ok(TemporaryArtifact::new(
            self.file.into_temp_path(),
            self.written,
            checksum,
        ))
    }
}
