//! Failure taxonomy for a single materialize request.
//!
//! Every variant is recovered at the materializer boundary and reported as
//! `Outcome::Failed`; nothing here is surfaced to the hook caller as a fault.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Coarse classification of a `MaterializeError`, one per failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidPath,
    UnmappablePath,
    Directory,
    InvalidUrl,
    TempFile,
    Network,
    HttpStatus,
    Integrity,
    Placement,
}

/// Why a downloaded body was rejected after the transfer completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityFailure {
    /// `Content-MD5` did not match the digest of the received bytes (both lowercase hex).
    Md5Mismatch { expected: String, actual: String },
    /// Received byte count differs from the declared `Content-Length`.
    Truncated { expected: u64, received: u64 },
}

impl fmt::Display for IntegrityFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityFailure::Md5Mismatch { expected, actual } => {
                write!(f, "MD5 mismatch: expected {}, got {}", expected, actual)
            }
            IntegrityFailure::Truncated { expected, received } => {
                write!(f, "expected {} bytes, received {}", expected, received)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    #[error("path is not absolute: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("no remote URL for {}: {reason}", path.display())]
    UnmappablePath { path: PathBuf, reason: String },

    #[error("cannot prepare directory {}: {source}", dir.display())]
    Directory {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid remote URL {0:?}")]
    InvalidUrl(String),

    #[error("cannot stage temporary file in {}: {source}", dir.display())]
    TempFile {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("GET {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: curl::Error,
    },

    #[error("GET {url} returned HTTP {code}{}", reason_suffix(.reason))]
    HttpStatus {
        url: String,
        code: u32,
        reason: Option<String>,
    },

    #[error("integrity check failed for {url}: {failure}")]
    Integrity { url: String, failure: IntegrityFailure },

    #[error("cannot place {} at {}: {source}", temp.display(), target.display())]
    Placement {
        temp: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn reason_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(r) if !r.is_empty() => format!(" {}", r),
        _ => String::new(),
    }
}

impl MaterializeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MaterializeError::InvalidPath(_) => ErrorKind::InvalidPath,
            MaterializeError::UnmappablePath { .. } => ErrorKind::UnmappablePath,
            MaterializeError::Directory { .. } => ErrorKind::Directory,
            MaterializeError::InvalidUrl(_) => ErrorKind::InvalidUrl,
            MaterializeError::TempFile { .. } => ErrorKind::TempFile,
            MaterializeError::Network { .. } => ErrorKind::Network,
            MaterializeError::HttpStatus { .. } => ErrorKind::HttpStatus,
            MaterializeError::Integrity { .. } => ErrorKind::Integrity,
            MaterializeError::Placement { .. } => ErrorKind::Placement,
        }
    }
}
