//! On-demand materialization of mirrored files.
//!
//! When a local path under the mirrored tree is missing, [`Materializer`]
//! derives the object-store URL from the path, downloads it into a staging
//! file, verifies it and renames it into place.

pub mod config;
pub mod logging;

pub mod checksum;
pub mod dirs;
pub mod error;
pub mod fetcher;
pub mod mapper;
pub mod materializer;
pub mod storage;

pub use error::{ErrorKind, MaterializeError};
pub use materializer::{Materializer, Outcome, Request, ResolvedTarget, SkipReason};
