//! `anvil clear [--cache]` — drop repository metadata, or the whole
//! available tree including cached archives.

use crate::{common, output};
use anvil_core::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Also remove cached archives, not just metadata.
    #[arg(long)]
    pub cache: bool,
}

pub fn run(cli: &super::Cli, args: &ClearArgs) -> Result<()> {
    let ctx = common::load(&cli.config)?;
    let _lock = anvil_executor::DbLock::acquire(&ctx.config)?;
    anvil_fetcher::clear(&ctx.config, args.cache)?;
    output::status("cleared.");
    Ok(())
}
