// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! rl - Reefline robot CLI

mod commands;
mod error;
mod output;

use clap::{ArgAction, Parser, Subcommand};
use commands::{autos, check, sim};
use error::RlError;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "rl",
    version,
    about = "Reefline - cooperative task scheduling for a scoring robot"
)]
struct Cli {
    /// Robot configuration file (TOML); built-in defaults when omitted
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a robot config and print the resolved values
    Check(check::CheckArgs),
    /// List the autonomous routines
    Autos(autos::AutosArgs),
    /// Run the robot loop against the simulated hardware
    Sim(sim::SimArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check(args) => check::handle(args, cli.config.as_deref()),
        Commands::Autos(args) => autos::handle(args, cli.config.as_deref()),
        Commands::Sim(args) => sim::handle(args, cli.config.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<RlError>() {
                Some(friendly) => eprint!("{}", friendly),
                None => eprintln!("error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .init();
}
