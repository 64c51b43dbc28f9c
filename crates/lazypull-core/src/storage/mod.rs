//! Staging files and atomic placement.
//!
//! Downloads are streamed into a uniquely named temp file (`.lazypull-*.part`),
//! normally inside the target's own directory, and become visible at the target
//! path only through a single rename. A staged file that is never placed is
//! removed when its handle is dropped.

mod artifact;
mod writer;

pub use artifact::TemporaryArtifact;
pub use writer::StagingWriter;

/// Prefix of staging file names; leading dot keeps them out of casual listings.
pub const TEMP_PREFIX: &str = ".lazypull-";

/// Suffix of staging file names.
pub const TEMP_SUFFIX: &str = ".part";

/// Default permissions for placed files.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// True if `name` looks like one of our staging files.
pub fn is_staging_name(name: &str) -> bool {
    name.starts_with(TEMP_PREFIX) && name.ends_with(TEMP_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn stage_write_place() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("photo.jpg");

        let mut writer = StagingWriter::create_in(dir.path(), DEFAULT_FILE_MODE).unwrap();
        let name = writer.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(is_staging_name(&name), "unexpected staging name {name}");

        writer.write_chunk(b"hello ").unwrap();
        writer.write_chunk(b"world").unwrap();
        let artifact = writer.finish(Some("abc".to_string())).unwrap();
        assert_eq!(artifact.size(), 11);
        assert_eq!(artifact.checksum(), Some("abc"));

        let temp = artifact.path().to_path_buf();
        artifact.place(&final_path).unwrap();
        assert!(!temp.exists());
        assert_eq!(fs::read(&final_path).unwrap(), b"hello world");
    }

    #[test]
    fn place_overwrites_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("photo.jpg");
        fs::write(&final_path, b"stale placeholder").unwrap();

        let mut writer = StagingWriter::create_in(dir.path(), DEFAULT_FILE_MODE).unwrap();
        writer.write_chunk(b"fresh").unwrap();
        writer.finish(None).unwrap().place(&final_path).unwrap();
        assert_eq!(fs::read(&final_path).unwrap(), b"fresh");
    }

    #[test]
    fn dropped_artifact_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = StagingWriter::create_in(dir.path(), DEFAULT_FILE_MODE).unwrap();
        writer.write_chunk(b"partial").unwrap();
        let artifact = writer.finish(None).unwrap();
        let temp = artifact.path().to_path_buf();
        assert!(temp.exists());
        drop(artifact);
        assert!(!temp.exists());
    }

    #[test]
    fn dropped_writer_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = StagingWriter::create_in(dir.path(), DEFAULT_FILE_MODE).unwrap();
        writer.write_chunk(b"partial").unwrap();
        let temp = writer.path().to_path_buf();
        drop(writer);
        assert!(!temp.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn failed_placement_removes_temp() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = StagingWriter::create_in(dir.path(), DEFAULT_FILE_MODE).unwrap();
        writer.write_chunk(b"data").unwrap();
        let artifact = writer.finish(None).unwrap();
        let temp = artifact.path().to_path_buf();
        // Renaming a file onto a non-empty directory fails.
        let blocker = dir.path().join("blocker");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("inside"), b"x").unwrap();
        assert!(artifact.place(&blocker).is_err());
        assert!(!temp.exists());
    }

    #[cfg(unix)]
    #[test]
    fn placed_file_gets_requested_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("photo.jpg");
        let mut writer = StagingWriter::create_in(dir.path(), 0o640).unwrap();
        writer.write_chunk(b"x").unwrap();
        writer.finish(None).unwrap().place(&final_path).unwrap();
        let mode = fs::metadata(&final_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }
}
