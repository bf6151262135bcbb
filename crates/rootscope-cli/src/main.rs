//! rootscope CLI - Brent's method with a full iteration trace.
//!
//! # Usage
//!
//! ```bash
//! # Solve a preset on its default bracket
//! rootscope solve cubic
//!
//! # Custom bracket, tolerance and per-iteration table
//! rootscope solve "cos(x) - x" -a 0 -b 1 --tolerance 1e-12 --steps
//!
//! # Sample a function for plotting
//! rootscope --format csv sample exp
//!
//! # Store a default iteration cap
//! rootscope config set max_iterations 50
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};
use commands::Context;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::from_cli(&cli)?;

    // Execute command
    match cli.command {
        Commands::Solve(args) => commands::solve::execute(args, &ctx)?,
        Commands::Sample(args) => commands::sample::execute(args, &ctx)?,
        Commands::Presets => commands::presets::execute(&ctx)?,
        Commands::Config(args) => commands::config::execute(args, &ctx)?,
    }

    Ok(())
}

/// Logs go to stderr so that stdout stays clean for json/csv output.
fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "rootscope=debug,rootscope_math=debug",
        _ => "rootscope=trace,rootscope_math=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
