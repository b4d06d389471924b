//! MediaCheck
//!
//! Measures the technical properties of video files by decoding them and
//! validates the measurements against a target constraints document.
//!
//! # Usage
//!
//! ```bash
//! mediacheck check clip.mp4 --constraints target.json
//! mediacheck check ./deliveries --constraints target.yaml --jobs 4 --summary-only
//! mediacheck constraints init target.json
//! mediacheck constraints lint target.json
//! ```
//!
//! Exit codes: 0 on success, 2 when validation fails or a file cannot be
//! measured, 1 on fatal errors.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use mediacheck_cli::app::CheckOutcome;
use mediacheck_cli::cli::{commands, Cli, Commands};
use mediacheck_cli::config_initialization::{initialize_configuration_hierarchy, log_settings};
use mediacheck_cli::utils::logging::init_logging;

/// Exit code for fatal errors, argument errors included
const EXIT_FATAL: u8 = 1;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_FATAL)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

async fn run(cli: Cli) -> Result<CheckOutcome> {
    let settings = initialize_configuration_hierarchy(&cli)?;
    init_logging(&settings.logging)?;
    log_settings(&settings);

    info!("Starting MediaCheck {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Check(args) => commands::check(args, &settings).await,
        Commands::Constraints(command) => commands::constraints(command),
    }
}
