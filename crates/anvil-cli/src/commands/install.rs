//! `anvil install TARGET...`

use crate::chooser::PromptChooser;
use crate::{common, output};
use anvil_core::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Package, group, or virtual package targets, e.g. `foo:amd64 >= 1.0`
    #[arg(required = true)]
    pub targets: Vec<String>,
}

pub fn run(cli: &super::Cli, args: &InstallArgs) -> Result<()> {
    let mut ctx = common::load(&cli.config)?;
    let _lock = anvil_executor::DbLock::acquire(&ctx.config)?;

    let units = common::resolve_units(&ctx.available, &args.targets)?;
    let chooser = PromptChooser;
    let plan = anvil_resolver::install(&ctx.config, &ctx.installed, &ctx.available, units, &chooser)?;

    let plain = output::use_plain(cli.plain);
    output::render_plan(&plan, plain);
    if plan.is_empty() {
        return Ok(());
    }
    if !common::confirm(cli.yes, "proceed with this plan?") {
        output::status("aborted.");
        return Ok(());
    }

    let packages = common::install_order(&plan.to_install);
    anvil_fetcher::download(&ctx.config, &packages)?;
    for package in packages {
        let archive_path = common::cached_archive_path(&ctx.config, &package);
        let archive_path = archive_path.is_file().then_some(archive_path.as_path());
        anvil_executor::install_one(&ctx.config, &mut ctx.installed, package, archive_path)?;
    }
    output::status("done.");
    Ok(())
}
