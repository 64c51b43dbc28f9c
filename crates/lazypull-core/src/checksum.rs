//! MD5 digests for `Content-MD5` verification.
//!
//! The fetcher hashes the body while streaming it; `md5_path` recomputes the
//! digest of a file already on disk.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Compute MD5 of a file and return the digest as lowercase hex.
/// Reads in chunks to keep memory use bounded.
pub fn md5_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut ctx = md5::Context::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        ctx.consume(&buf[..n]);
    }
    Ok(format!("{:x}", ctx.compute()))
}

/// Normalizes a `Content-MD5` header value to lowercase hex.
///
/// Servers send either 32 hex digits or the base64 encoding of the raw 16-byte
/// digest (RFC 1864). Returns `None` for anything else, in which case the
/// caller skips verification.
pub fn normalize_content_md5(value: &str) -> Option<String> {
    let value = value.trim();
    if value.len() == 32 && value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Some(value.to_ascii_lowercase());
    }
    if value.len() == 24 {
        if let Ok(raw) = STANDARD.decode(value) {
            if raw.len() == 16 {
                return Some(hex::encode(raw));
            }
        }
    }
    None
}
