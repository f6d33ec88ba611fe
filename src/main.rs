mod cli;
mod core;
mod domain;
mod infra;

use cli::commands::run;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Context build failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
