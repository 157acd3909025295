//! `anvil search TERM`

use crate::{common, output};
use anvil_core::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Case-insensitive substring to match against names and tags.
    pub term: String,

    /// Search the installed set instead of the available set.
    #[arg(long)]
    pub installed: bool,
}

pub fn run(cli: &super::Cli, args: &SearchArgs) -> Result<()> {
    let ctx = common::load(&cli.config)?;
    let set = if args.installed { &ctx.installed } else { &ctx.available };
    let results = set.search(&args.term);
    output::render_search_results(&results);
    Ok(())
}
