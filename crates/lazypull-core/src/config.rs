use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dirs::DEFAULT_DIR_MODE;
use crate::fetcher::{FetchOptions, DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT};
use crate::storage::DEFAULT_FILE_MODE;

/// Mirror configuration loaded from `~/.config/lazypull/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Root URL of the object store (e.g. `https://bucket.s3.amazonaws.com/live`).
    /// The remote key (starting at `marker`) is appended and percent-encoded.
    pub base_url: String,
    /// Path segment where the remote key begins; matched case-insensitively.
    pub marker: String,
    /// Total transfer timeout in seconds.
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,
    /// Mode for created directories, as an octal string.
    #[serde(default = "default_dir_mode", with = "octal_mode")]
    pub dir_mode: u32,
    /// Mode for placed files, as an octal string.
    #[serde(default = "default_file_mode", with = "octal_mode")]
    pub file_mode: u32,
    #[serde(default = "default_true")]
    pub verify_md5: bool,
    /// Leave targets that already hold a regular file alone.
    #[serde(default)]
    pub skip_existing: bool,
    /// Where to stage downloads. Unset = the target's own directory, which keeps
    /// the final rename on one filesystem.
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_max_redirects() -> u32 {
    DEFAULT_MAX_REDIRECTS
}

fn default_dir_mode() -> u32 {
    DEFAULT_DIR_MODE
}

fn default_file_mode() -> u32 {
    DEFAULT_FILE_MODE
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            marker: "/wp-content/".to_string(),
            timeout_secs: 300,
            connect_timeout_secs: default_connect_timeout_secs(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            dir_mode: DEFAULT_DIR_MODE,
            file_mode: DEFAULT_FILE_MODE,
            verify_md5: true,
            skip_existing: false,
            staging_dir: None,
            user_agent: default_user_agent(),
        }
    }
}

impl MirrorConfig {
    /// Checks the settings a `Materializer` cannot run without.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("base_url is not configured");
        }
        url::Url::parse(self.base_url.trim())
            .with_context(|| format!("base_url {:?} is not a valid URL", self.base_url))?;
        if self.marker.is_empty() {
            bail!("marker must not be empty");
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be positive");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            max_redirects: self.max_redirects,
            verify_md5: self.verify_md5,
            file_mode: self.file_mode,
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Serialize modes as `"0755"`-style strings; plain integers are accepted on input.
mod octal_mode {
    use serde::de::{self, Deserializer, Unexpected, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(mode: &u32, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("{:04o}", mode))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        struct ModeVisitor;

        impl<'de> Visitor<'de> for ModeVisitor {
            type Value = u32;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an octal mode string such as \"0755\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<u32, E> {
                let digits = v.trim().trim_start_matches("0o");
                u32::from_str_radix(digits, 8)
                    .ok()
                    .filter(|m| *m <= 0o7777)
                    .ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<u32, E> {
                u32::try_from(v)
                    .ok()
                    .filter(|m| *m <= 0o7777)
                    .ok_or_else(|| E::invalid_value(Unexpected::Signed(v), &self))
            }
        }

        d.deserialize_any(ModeVisitor)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("lazypull")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<MirrorConfig> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: MirrorConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MirrorConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MirrorConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}
