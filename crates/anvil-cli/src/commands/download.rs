//! `anvil download TARGET...` — fetch archives into the cache without
//! installing them.

use crate::chooser::PromptChooser;
use crate::{common, output};
use anvil_core::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Package, group, or virtual package targets.
    #[arg(required = true)]
    pub targets: Vec<String>,
}

pub fn run(cli: &super::Cli, args: &DownloadArgs) -> Result<()> {
    let ctx = common::load(&cli.config)?;
    let _lock = anvil_executor::DbLock::acquire(&ctx.config)?;

    let units = common::resolve_units(&ctx.available, &args.targets)?;
    let packages = common::expand_to_packages(&ctx.available, units, &PromptChooser)?;
    anvil_fetcher::download(&ctx.config, &packages)?;
    output::status(&format!("downloaded {} package(s).", packages.len()));
    Ok(())
}
