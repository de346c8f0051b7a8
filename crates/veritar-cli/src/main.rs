//! Veritar CLI - verify tar archives against MD5 checksum files and create
//! archives with a matching checksum file.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    init_tracing();
    install_interrupt_handler();

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    let (operation, result) = match &cli.command {
        cli::Commands::Verify(args) => ("verify", commands::verify::execute(args, &*formatter)),
        cli::Commands::Create(args) => (
            "create",
            commands::create::execute(args, &*formatter, cli.quiet).map(|()| ExitCode::SUCCESS),
        ),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            ("completion", Ok(ExitCode::SUCCESS))
        }
    };

    result.unwrap_or_else(|err| {
        formatter.format_error(operation, &err);
        ExitCode::from(error::EXIT_ERROR)
    })
}

/// Diagnostics go to stderr, filtered by `VERITAR_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("VERITAR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn install_interrupt_handler() {
    if let Err(err) = ctrlc::set_handler(|| {
        eprintln!("Operation aborted by user");
        std::process::exit(error::EXIT_INTERRUPTED);
    }) {
        tracing::warn!(error = %err, "failed to install interrupt handler");
    }
}
