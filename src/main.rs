//! Canon CLI - scripture corpus normalization and structured extraction

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = canon_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
