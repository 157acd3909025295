//! `anvil enable-local NAME PATH` — register a local filesystem path as a
//! repository and persist the change to the configuration file.

use crate::{common, output};
use anvil_core::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct EnableLocalArgs {
    /// The repository name to register.
    pub name: String,
    /// The local directory to serve as the repository target.
    pub path: PathBuf,
}

pub fn run(cli: &super::Cli, args: &EnableLocalArgs) -> Result<()> {
    let mut ctx = common::load(&cli.config)?;
    let _lock = anvil_executor::DbLock::acquire(&ctx.config)?;

    anvil_fetcher::enable_local(&mut ctx.config, args.name.clone(), &args.path)?;
    anvil_core::yaml::to_file(&cli.config, &ctx.config)?;
    output::status(&format!("repository '{}' enabled.", args.name));
    Ok(())
}
