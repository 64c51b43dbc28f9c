//! Request orchestration: validate → ensure directory → derive URL → fetch → place.
//!
//! A request never faults its caller. `materialize` always hands back the path it
//! was given; what happened is reported through `tracing` (and, for callers that
//! want it, the `Outcome` returned by `resolve`). On any failure the target path
//! is left exactly as it was, because the final rename is the only write to it.
//!
//! Requests are independent: two concurrent requests for the same path both
//! download, and the last rename wins.

mod outcome;

pub use outcome::{Outcome, Request, ResolvedTarget, SkipReason};

use crate::config::MirrorConfig;
use crate::dirs::DirectoryEnsurer;
use crate::error::MaterializeError;
use crate::fetcher::Fetcher;
use crate::mapper::PathMapper;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Materializer {
    mapper: PathMapper,
    dirs: DirectoryEnsurer,
    fetcher: Fetcher,
    timeout: Duration,
    staging_dir: Option<PathBuf>,
    skip_existing: bool,
}

impl Materializer {
    /// Builds a materializer from validated configuration.
    pub fn new(cfg: &MirrorConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            mapper: PathMapper::new(&cfg.base_url, &cfg.marker)?,
            dirs: DirectoryEnsurer::new(cfg.dir_mode),
            fetcher: Fetcher::new(cfg.fetch_options()),
            timeout: cfg.timeout(),
            staging_dir: cfg.staging_dir.clone(),
            skip_existing: cfg.skip_existing,
        })
    }

    /// Hook entry point: make `local_path` exist if its remote copy can be fetched,
    /// and return `local_path` unchanged either way.
    pub fn materialize<P: AsRef<Path>>(&self, local_path: P) -> PathBuf {
        let request = Request::new(local_path.as_ref());
        let _ = self.resolve(&request);
        request.into_local_path()
    }

    /// Runs one request and returns what happened. Failures are also logged at `warn`.
    pub fn resolve(&self, request: &Request) -> Outcome {
        let path = request.local_path();
        tracing::debug!(path = %path.display(), "materialize requested");
        let outcome = self.run(path);
        match &outcome {
            Outcome::Success(p) => tracing::info!(path = %p.display(), "materialized"),
            Outcome::Skipped(reason) => {
                tracing::debug!(path = %path.display(), %reason, "materialize skipped")
            }
            Outcome::Failed(e) => tracing::warn!(
                path = %path.display(),
                kind = ?e.kind(),
                "materialize failed: {}",
                e
            ),
        }
        outcome
    }

    /// Validation and URL derivation only; no filesystem or network access.
    pub fn target(&self, request: &Request) -> Result<ResolvedTarget, MaterializeError> {
        let path = request.local_path();
        let remote_url = self.mapper.derive(path)?;
        Ok(ResolvedTarget {
            local_path: path.to_path_buf(),
            remote_url,
        })
    }

    fn run(&self, path: &Path) -> Outcome {
        if !path.is_absolute() {
            return Outcome::Skipped(SkipReason::NotMirrored);
        }
        if self.skip_existing && path.is_file() {
            return Outcome::Skipped(SkipReason::AlreadyPresent);
        }
        match self.fetch_and_place(path) {
            Ok(target) => Outcome::Success(target.local_path),
            Err(e) => Outcome::Failed(e),
        }
    }

    fn fetch_and_place(&self, path: &Path) -> Result<ResolvedTarget, MaterializeError> {
        self.dirs.ensure_parent(path)?;

        let remote_url = self.mapper.derive(path)?;
        tracing::debug!(path = %path.display(), url = %remote_url, "derived remote URL");
        let target = ResolvedTarget {
            local_path: path.to_path_buf(),
            remote_url,
        };

        // ensure_parent succeeded, so the path has a parent.
        let staging_dir = match &self.staging_dir {
            Some(dir) => dir.as_path(),
            None => path.parent().unwrap_or(path),
        };
        let artifact = self
            .fetcher
            .fetch(&target.remote_url, self.timeout, staging_dir)?;

        let temp = artifact.path().to_path_buf();
        let size = artifact.size();
        artifact
            .place(&target.local_path)
            .map_err(|source| MaterializeError::Placement {
                temp,
                target: target.local_path.clone(),
                source,
            })?;
        tracing::debug!(path = %target.local_path.display(), bytes = size, "placed");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn materializer(base_url: &str) -> Materializer {
        let cfg = MirrorConfig {
            base_url: base_url.to_string(),
            ..MirrorConfig::default()
        };
        Materializer::new(&cfg).unwrap()
    }

    #[test]
    fn new_rejects_unconfigured_base_url() {
        assert!(Materializer::new(&MirrorConfig::default()).is_err());
    }

    #[test]
    fn relative_path_is_skipped_and_returned_unchanged() {
        let m = materializer("http://127.0.0.1:9/live");
        let outcome = m.resolve(&Request::new("wp-content/uploads/photo.jpg"));
        assert!(matches!(outcome, Outcome::Skipped(SkipReason::NotMirrored)));
        assert_eq!(
            m.materialize("wp-content/uploads/photo.jpg"),
            PathBuf::from("wp-content/uploads/photo.jpg")
        );
        assert!(!Path::new("wp-content").exists());
    }

    #[test]
    fn target_derives_without_io() {
        let m = materializer("https://cdn.example.com/live");
        let target = m
            .target(&Request::new("/nonexistent-root/wp-content/uploads/2020/01/photo.jpg"))
            .unwrap();
        assert_eq!(
            target.remote_url,
            "https://cdn.example.com/live/wp-content/uploads/2020/01/photo.jpg"
        );
        assert!(!Path::new("/nonexistent-root").exists());
        let err = m.target(&Request::new("relative/wp-content/x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
    }

    #[test]
    fn unmappable_path_fails_after_directory_step() {
        let root = tempfile::tempdir().unwrap();
        let m = materializer("http://127.0.0.1:9/live");
        let path = root.path().join("media/photo.jpg");
        let outcome = m.resolve(&Request::new(&path));
        assert_eq!(outcome.error().map(|e| e.kind()), Some(ErrorKind::UnmappablePath));
        assert!(!path.exists());
        assert_eq!(m.materialize(&path), path);
    }

    #[test]
    fn directory_failure_stops_request() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("wp-content"), b"file").unwrap();
        let m = materializer("http://127.0.0.1:9/live");
        let path = root.path().join("wp-content/photo.jpg");
        let outcome = m.resolve(&Request::new(&path));
        assert_eq!(outcome.error().map(|e| e.kind()), Some(ErrorKind::Directory));
    }

    #[test]
    fn skip_existing_leaves_file_alone() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("wp-content/photo.jpg");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"local").unwrap();
        let cfg = MirrorConfig {
            base_url: "http://127.0.0.1:9/live".to_string(),
            skip_existing: true,
            ..MirrorConfig::default()
        };
        let m = Materializer::new(&cfg).unwrap();
        let outcome = m.resolve(&Request::new(&path));
        assert!(matches!(outcome, Outcome::Skipped(SkipReason::AlreadyPresent)));
        assert_eq!(std::fs::read(&path).unwrap(), b"local");
    }

    #[test]
    fn skip_reason_messages() {
        assert_eq!(SkipReason::NotMirrored.to_string(), "not a local-mirrored path");
        assert_eq!(SkipReason::AlreadyPresent.to_string(), "already present");
    }
}
