//! Single-attempt HTTP GET into a staging file.
//!
//! Uses the curl crate (libcurl) in the calling thread. The body is streamed
//! into a fresh `StagingWriter` and hashed on the way; the result is only handed
//! out as a `TemporaryArtifact` after the status code and integrity checks pass.
//! Every error path drops the writer, which deletes the partial file.

mod headers;

pub use headers::ResponseHead;

use crate::checksum::normalize_content_md5;
use crate::error::{IntegrityFailure, MaterializeError};
use crate::storage::{StagingWriter, TemporaryArtifact, DEFAULT_FILE_MODE};
use std::io;
use std::path::Path;
use std::str;
use std::time::Duration;

/// Default wall-clock limit for one transfer.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_REDIRECTS: u32 = 5;
pub const DEFAULT_USER_AGENT: &str = concat!("lazypull/", env!("CARGO_PKG_VERSION"));

/// Transfer settings that stay fixed for the life of a `Fetcher`.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    pub max_redirects: u32,
    /// Check the body against `Content-MD5` when the server sends one.
    pub verify_md5: bool,
    /// Permissions given to the staged file before it is handed out.
    pub file_mode: u32,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            verify_md5: true,
            file_mode: DEFAULT_FILE_MODE,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    opts: FetchOptions,
}

impl Fetcher {
    pub fn new(opts: FetchOptions) -> Self {
        Self { opts }
    }

    /// Downloads `remote_url` into a new staging file under `staging_dir`.
    ///
    /// `timeout` bounds the whole transfer; a zero duration means `DEFAULT_TIMEOUT`.
    /// Succeeds only on HTTP 200 with a body that matches any declared
    /// `Content-Length` and (when enabled) `Content-MD5`.
    pub fn fetch(
        &self,
        remote_url: &str,
        timeout: Duration,
        staging_dir: &Path,
    ) -> Result<TemporaryArtifact, MaterializeError> {
        if remote_url.trim().is_empty() {
            return Err(MaterializeError::InvalidUrl(remote_url.to_string()));
        }
        let timeout = if timeout.is_zero() { DEFAULT_TIMEOUT } else { timeout };
        let network = |source| MaterializeError::Network {
            url: remote_url.to_string(),
            source,
        };
        let temp_file = |source| MaterializeError::TempFile {
            dir: staging_dir.to_path_buf(),
            source,
        };

        let mut writer = StagingWriter::create_in(staging_dir, self.opts.file_mode).map_err(temp_file)?;
        tracing::debug!(url = remote_url, temp = %writer.path().display(), "fetch started");

        let mut easy = curl::easy::Easy::new();
        easy.url(remote_url)
            .map_err(|_| MaterializeError::InvalidUrl(remote_url.to_string()))?;
        easy.get(true).map_err(network)?;
        easy.follow_location(true).map_err(network)?;
        easy.max_redirections(self.opts.max_redirects).map_err(network)?;
        easy.useragent(&self.opts.user_agent).map_err(network)?;
        easy.connect_timeout(self.opts.connect_timeout.min(timeout))
            .map_err(network)?;
        easy.timeout(timeout).map_err(network)?;

        let mut header_lines: Vec<String> = Vec::new();
        let mut hasher = md5::Context::new();
        let mut write_error: Option<io::Error> = None;

        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    if let Ok(s) = str::from_utf8(data) {
                        header_lines.push(s.trim_end().to_string());
                    }
                    true
                })
                .map_err(network)?;
            transfer
                .write_function(|data| match writer.write_chunk(data) {
                    Ok(()) => {
                        hasher.consume(data);
                        Ok(data.len())
                    }
                    Err(e) => {
                        write_error = Some(e);
                        Ok(0) // abort transfer
                    }
                })
                .map_err(network)?;
            transfer.perform()
        };
        let head = headers::parse_headers(&header_lines);
        let received = writer.written();
        if let Err(e) = performed {
            if e.is_write_error() {
                if let Some(source) = write_error.take() {
                    return Err(temp_file(source));
                }
            }
            // Connection closed before the declared length arrived.
            if e.is_partial_file() {
                if let Some(expected) = head.content_length {
                    return Err(MaterializeError::Integrity {
                        url: remote_url.to_string(),
                        failure: IntegrityFailure::Truncated { expected, received },
                    });
                }
            }
            return Err(network(e));
        }

        let code = easy.response_code().map_err(network)?;
        if code != 200 {
            return Err(MaterializeError::HttpStatus {
                url: remote_url.to_string(),
                code,
                reason: head.reason,
            });
        }

        if let Some(expected) = head.content_length {
            if expected != received {
                return Err(MaterializeError::Integrity {
                    url: remote_url.to_string(),
                    failure: IntegrityFailure::Truncated { expected, received },
                });
            }
        }

        let actual = format!("{:x}", hasher.compute());
        if self.opts.verify_md5 {
            if let Some(raw) = head.content_md5.as_deref() {
                match normalize_content_md5(raw) {
                    Some(expected) if expected != actual => {
                        return Err(MaterializeError::Integrity {
                            url: remote_url.to_string(),
                            failure: IntegrityFailure::Md5Mismatch { expected, actual },
                        });
                    }
                    Some(_) => tracing::debug!(url = remote_url, "Content-MD5 verified"),
                    None => tracing::debug!(url = remote_url, value = raw, "ignoring unrecognized Content-MD5"),
                }
            }
        }

        let artifact = writer.finish(Some(actual)).map_err(temp_file)?;
        tracing::debug!(url = remote_url, bytes = received, "fetch complete");
        Ok(artifact)
    }
}
