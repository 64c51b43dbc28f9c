//! `lazypull url <path>` – show the derived remote URL.

use anyhow::Result;
use lazypull_core::config::MirrorConfig;
use lazypull_core::{Materializer, Request};

pub fn run_url(cfg: &MirrorConfig, path: &str) -> Result<()> {
    let target = Materializer::new(cfg)?.target(&Request::new(path))?;
    println!("{}", target.remote_url);
    Ok(())
}
