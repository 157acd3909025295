//! The `anvil` command-line interface: one subcommand per resolver
//! operation, plus the repository maintenance verbs (`search`, `sync`,
//! `download`, `clear`, `enable-local`).

mod chooser;
mod commands;
mod common;
mod output;

use clap::Parser;
use commands::{Cli, Commands};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Install(args) => commands::install::run(&cli, args),
        Commands::Uninstall(args) => commands::uninstall::run(&cli, args),
        Commands::Upgrade(args) => commands::upgrade::run(&cli, args),
        Commands::Downgrade(args) => commands::downgrade::run(&cli, args),
        Commands::Search(args) => commands::search::run(&cli, args),
        Commands::Sync(args) => commands::sync::run(&cli, args),
        Commands::Download(args) => commands::download::run(&cli, args),
        Commands::Clear(args) => commands::clear::run(&cli, args),
        Commands::EnableLocal(args) => commands::enable_local::run(&cli, args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(code = %err.code(), "{err}");
            eprintln!("error: {err} ({})", err.code());
            ExitCode::from(common::exit_code(&err) as u8)
        }
    }
}
