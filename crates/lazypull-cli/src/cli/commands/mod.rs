//! CLI command handlers, one per file.

mod checksum;
mod config;
mod get;
mod url;

pub use checksum::run_checksum;
pub use config::run_config;
pub use get::run_get;
pub use url::run_url;
