//! `lazypull config` – show where settings come from and their effective values.

use anyhow::Result;
use lazypull_core::config::{self, MirrorConfig};
use std::path::Path;

pub fn run_config(cfg: &MirrorConfig, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    if let Err(e) = cfg.validate() {
        eprintln!("warning: {:#}", e);
    }
    Ok(())
}
