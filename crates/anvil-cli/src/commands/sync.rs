//! `anvil sync` — refresh every enabled repository's metadata.

use crate::{common, output};
use anvil_core::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct SyncArgs;

pub fn run(cli: &super::Cli, _args: &SyncArgs) -> Result<()> {
    let ctx = common::load(&cli.config)?;
    let _lock = anvil_executor::DbLock::acquire(&ctx.config)?;
    anvil_fetcher::sync(&ctx.config)?;
    output::status("repositories synchronised.");
    Ok(())
}
