//! Per-request values threaded through the materializer.

use crate::error::MaterializeError;
use std::fmt;
use std::path::{Path, PathBuf};

/// One lookup of a local file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    local_path: PathBuf,
}

impl Request {
    pub fn new(local_path: impl Into<PathBuf>) -> Self {
        Self {
            local_path: local_path.into(),
        }
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn into_local_path(self) -> PathBuf {
        self.local_path
    }
}

/// A request paired with the remote object it mirrors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub local_path: PathBuf,
    pub remote_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Relative path: not part of the mirrored tree.
    NotMirrored,
    /// `skip_existing` is on and the target is already a regular file.
    AlreadyPresent,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotMirrored => f.write_str("not a local-mirrored path"),
            SkipReason::AlreadyPresent => f.write_str("already present"),
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    /// The remote object now sits at this path.
    Success(PathBuf),
    Skipped(SkipReason),
    Failed(MaterializeError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn error(&self) -> Option<&MaterializeError> {
        match self {
            Outcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(p) => write!(f, "materialized {}", p.display()),
            Outcome::Skipped(reason) => write!(f, "skipped: {}", reason),
            Outcome::Failed(e) => write!(f, "failed: {}", e),
        }
    }
}
