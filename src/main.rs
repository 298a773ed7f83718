//! DevNet Inspector - agent configuration tool.

use std::process::ExitCode;

use devnet_inspector::cli::{configured_log_level, exit_code, Cli};
use devnet_inspector::logging::init_logging;
use tracing::{debug, error, info};

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // The file is read here only for its log level; the command reads it again.
    let (level, level_err) = match cli.log_level {
        Some(level) => (Some(level), None),
        None => match configured_log_level(&cli.config_path()) {
            Ok(level) => (Some(level), None),
            Err(e) => (None, Some(e)),
        },
    };
    if let Err(e) = init_logging(level) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("DevNet Inspector {} starting", env!("CARGO_PKG_VERSION"));
    if let Some(e) = level_err {
        debug!("Using default log level: {:#}", e);
    }

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}
