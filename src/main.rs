mod cli;
mod commands;
mod model;
mod util;

use std::process::ExitCode;

use anyhow::{Error, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() -> ExitCode {
    install_subscriber();

    match dispatch(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Discover(args) => commands::discover::run(args),
        Commands::CheckCatalog(args) => commands::check_catalog::run(args),
    }
}

fn report_failure(err: &Error) {
    error!(error = %err, "kitab-structure failed");
    for (depth, cause) in err.chain().skip(1).enumerate() {
        error!(depth = depth + 1, cause = %cause, "underlying error");
    }
}

/// Writes to stderr; `RUST_LOG` overrides the default `info` level.
fn install_subscriber() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
