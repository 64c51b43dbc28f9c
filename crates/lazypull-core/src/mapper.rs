//! Local path to remote object URL mapping.
//!
//! The remote key of a mirrored file is the suffix of its local path starting at
//! a fixed marker segment (e.g. `/wp-content/`); the URL is that suffix appended
//! to the configured bucket root.

use crate::error::MaterializeError;
use anyhow::{bail, Context, Result};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct PathMapper {
    base_url: String,
    marker: String,
    /// Lowercased once; the marker match is ASCII case-insensitive.
    marker_lower: String,
}

impl PathMapper {
    /// Builds a mapper for `base_url` (bucket root, no trailing separator expected)
    /// and `marker` (the segment where the remote key begins).
    pub fn new(base_url: &str, marker: &str) -> Result<Self> {
        if marker.is_empty() {
            bail!("marker must not be empty");
        }
        let base_url = base_url.trim();
        url::Url::parse(base_url).with_context(|| format!("invalid base URL {:?}", base_url))?;
        Ok(Self {
            base_url: base_url.to_string(),
            marker: marker.to_string(),
            marker_lower: marker.to_ascii_lowercase(),
        })
    }

    /// Derives the remote URL for `local_path`, percent-encoded where the
    /// path needs it (e.g. a space becomes `%20`).
    ///
    /// Fails with `InvalidPath` for relative paths and `UnmappablePath` when the
    /// marker is absent (or the result does not parse as a URL).
    ///
    /// # Examples
    ///
    /// - base `https://cdn.example.com/live`, marker `/wp-content/`,
    ///   `/site/wp-content/uploads/a.jpg` → `https://cdn.example.com/live/wp-content/uploads/a.jpg`
    pub fn derive(&self, local_path: &Path) -> Result<String, MaterializeError> {
        if !local_path.is_absolute() {
            return Err(MaterializeError::InvalidPath(local_path.to_path_buf()));
        }
        let path = local_path
            .to_str()
            .ok_or_else(|| MaterializeError::UnmappablePath {
                path: local_path.to_path_buf(),
                reason: "path is not valid UTF-8".to_string(),
            })?;

        // ASCII lowercasing keeps byte offsets aligned with the original string.
        let start = path
            .to_ascii_lowercase()
            .find(&self.marker_lower)
            .ok_or_else(|| MaterializeError::UnmappablePath {
                path: local_path.to_path_buf(),
                reason: format!("marker {:?} not found", self.marker),
            })?;

        let joined = format!("{}{}", self.base_url, &path[start..]);
        // Serializing the parsed URL percent-encodes spaces and non-ASCII bytes.
        let remote_url = url::Url::parse(&joined).map_err(|e| MaterializeError::UnmappablePath {
            path: local_path.to_path_buf(),
            reason: format!("derived URL {:?} does not parse: {}", joined, e),
        })?;
        Ok(remote_url.into())
    }
}
