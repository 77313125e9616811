//! # verstamp CLI
//!
//! Binary entry point for the `verstamp` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap` and scanning them into a
//!   run request.
//! - Running the driver from the `verstamp` library.
//! - Translating the outcome into the documented process exit codes.
//!
//! All failures are reported through the exit code; argument and version
//! format errors are additionally logged at error level.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use log::error;

use verstamp::driver;

fn main() -> ExitCode {
    env_logger::init();

    let cli = cli::Cli::parse();
    let request = match cli.into_request() {
        Ok(request) => request,
        Err(err) => {
            error!("{err}");
            return ExitCode::from(driver::EXIT_NO_ARGUMENTS);
        }
    };

    ExitCode::from(driver::run(&request).exit_code())
}
