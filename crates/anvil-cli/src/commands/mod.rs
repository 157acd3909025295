//! CLI commands: one subcommand per resolver operation plus `search`,
//! `sync`, `download`, `clear`, `enable-local`.

pub mod clear;
pub mod downgrade;
pub mod download;
pub mod enable_local;
pub mod install;
pub mod search;
pub mod sync;
pub mod uninstall;
pub mod upgrade;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "anvil")]
#[command(author = "Anvil Contributors")]
#[command(version)]
#[command(about = "A source-agnostic Unix package manager", long_about = None)]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = "/etc/anvil/config.yml")]
    pub config: PathBuf,

    /// Assume yes to any confirmation prompt.
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Force plain-line output even on a tty.
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install one or more packages, groups, or virtual packages
    Install(install::InstallArgs),
    /// Uninstall one or more installed packages
    Uninstall(uninstall::UninstallArgs),
    /// Upgrade installed packages to a newer available version
    Upgrade(upgrade::UpgradeArgs),
    /// Downgrade installed packages to an older available version
    Downgrade(downgrade::DowngradeArgs),
    /// Search available and installed packages by name or tag
    Search(search::SearchArgs),
    /// Synchronise repository metadata
    Sync(sync::SyncArgs),
    /// Download package archives without installing them
    Download(download::DownloadArgs),
    /// Clear the repository cache and/or metadata
    Clear(clear::ClearArgs),
    /// Register a local filesystem path as a repository
    #[command(name = "enable-local")]
    EnableLocal(enable_local::EnableLocalArgs),
}
