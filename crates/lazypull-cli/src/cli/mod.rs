//! CLI for lazypull.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use lazypull_core::config::{self, MirrorConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use commands::{run_checksum, run_config, run_get, run_url};

/// Top-level CLI for lazypull.
#[derive(Debug, Parser)]
#[command(name = "lazypull")]
#[command(about = "lazypull: fetch missing mirrored files from the object store", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Settings that take precedence over the config file.
#[derive(Debug, Default, Args)]
pub struct Overrides {
    /// Read configuration from FILE instead of ~/.config/lazypull/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Object store root URL the remote key is appended to.
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Path segment where the remote key begins (case-insensitive).
    #[arg(long, global = true)]
    pub marker: Option<String>,

    /// Transfer timeout in seconds.
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl Overrides {
    pub fn apply(&self, cfg: &mut MirrorConfig) {
        if let Some(url) = &self.base_url {
            cfg.base_url = url.clone();
        }
        if let Some(marker) = &self.marker {
            cfg.marker = marker.clone();
        }
        if let Some(secs) = self.timeout {
            cfg.timeout_secs = secs;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Materialize local paths from the object store; prints each path back.
    Get {
        /// Absolute local paths under the mirrored tree.
        #[arg(required = true)]
        paths: Vec<String>,

        /// Exit non-zero if any request failed.
        #[arg(long)]
        strict: bool,
    },

    /// Print the remote URL a local path maps to.
    Url {
        /// Absolute local path.
        path: String,
    },

    /// Compute MD5 of a file (the digest Content-MD5 is checked against).
    Checksum {
        /// Path to the file.
        path: String,
    },

    /// Show the config file location and effective settings.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<ExitCode> {
        let cli = Cli::parse();
        let mut cfg = match &cli.overrides.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        cli.overrides.apply(&mut cfg);
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Get { paths, strict } => return run_get(&cfg, &paths, strict),
            CliCommand::Url { path } => run_url(&cfg, &path)?,
            CliCommand::Checksum { path } => run_checksum(Path::new(&path))?,
            CliCommand::Config => run_config(&cfg, cli.overrides.config.as_deref())?,
        }

        Ok(ExitCode::SUCCESS)
    }
}

#[cfg(test)]
mod tests;
