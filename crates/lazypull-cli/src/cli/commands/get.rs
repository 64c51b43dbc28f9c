//! `lazypull get <path>...` – materialize local paths.

use anyhow::Result;
use lazypull_core::config::MirrorConfig;
use lazypull_core::{Materializer, Outcome, Request};
use std::process::ExitCode;

/// Prints every requested path on stdout, success or not; problems go to stderr.
pub fn run_get(cfg: &MirrorConfig, paths: &[String], strict: bool) -> Result<ExitCode> {
    let materializer = Materializer::new(cfg)?;
    let mut failed = 0usize;

    for path in paths {
        let request = Request::new(path);
        match materializer.resolve(&request) {
            Outcome::Success(_) => {}
            Outcome::Skipped(reason) => eprintln!("warning: {path}: skipped ({reason})"),
            Outcome::Failed(e) => {
                failed += 1;
                eprintln!("warning: {path}: {e}");
            }
        }
        println!("{}", request.local_path().display());
    }

    if strict && failed > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
