use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

use crate::cli::Cli;
use crate::config::Settings;

mod batch;
mod cli;
mod config;

const EXIT_OK: u8 = 0;
const EXIT_FAILURE: u8 = 1;

fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    let status = run_cli(&cli, &mut io::stdout().lock(), &mut io::stderr().lock());
    ExitCode::from(status)
}

/// Resolve settings and run the batch, returning the process exit status.
/// Progress goes to `out`, fatal errors to `err`.
fn run_cli<W: Write, E: Write>(cli: &Cli, out: &mut W, err: &mut E) -> u8 {
    let settings = match Settings::resolve(cli) {
        Ok(settings) => settings,
        Err(e) => {
            let _ = writeln!(err, "✗ {}", e);
            return EXIT_FAILURE;
        }
    };
    log::info!(
        "Cleaning {} (threshold {})",
        settings.dir.display(),
        settings.threshold
    );

    match batch::run_with_output(&settings.dir, settings.threshold, out) {
        Ok(summary) => {
            log::info!(
                "Done: {} processed, {} failed",
                summary.processed,
                summary.failed
            );
            EXIT_OK
        }
        Err(e) => {
            let _ = writeln!(err, "✗ {}", e);
            EXIT_FAILURE
        }
    }
}
