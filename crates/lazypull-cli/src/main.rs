use lazypull_core::logging;
use std::process::ExitCode;

mod cli;

use crate::cli::CliCommand;

fn main() -> ExitCode {
    // Log to the state dir when possible; stderr otherwise.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    match CliCommand::run_from_args() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("lazypull error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
