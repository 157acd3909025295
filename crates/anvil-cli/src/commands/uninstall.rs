//! `anvil uninstall TARGET...`

use crate::{common, output};
use anvil_core::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct UninstallArgs {
    /// Installed package, group, or virtual package targets.
    #[arg(required = true)]
    pub targets: Vec<String>,

    /// Preserve files the package marked as static (rename aside instead of
    /// removing).
    #[arg(long)]
    pub keep_static: bool,
}

pub fn run(cli: &super::Cli, args: &UninstallArgs) -> Result<()> {
    let mut ctx = common::load(&cli.config)?;
    let _lock = anvil_executor::DbLock::acquire(&ctx.config)?;

    let units = common::resolve_units(&ctx.installed, &args.targets)?;
    let plan = anvil_resolver::uninstall(&ctx.installed, units)?;

    let plain = output::use_plain(cli.plain);
    output::render_plan(&plan, plain);
    if plan.is_empty() {
        return Ok(());
    }
    if !common::confirm(cli.yes, "proceed with this plan?") {
        output::status("aborted.");
        return Ok(());
    }

    for package in common::uninstall_order(&plan.to_uninstall) {
        anvil_executor::uninstall_one(&ctx.config, &mut ctx.installed, &package, args.keep_static)?;
    }
    output::status("done.");
    Ok(())
}
