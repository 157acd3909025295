//! `anvil upgrade [TARGET...]`

use crate::{common, output};
use anvil_core::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct UpgradeArgs {
    /// Installed packages to upgrade. Omit to upgrade everything installed.
    pub targets: Vec<String>,
}

pub fn run(cli: &super::Cli, args: &UpgradeArgs) -> Result<()> {
    let mut ctx = common::load(&cli.config)?;
    let _lock = anvil_executor::DbLock::acquire(&ctx.config)?;

    let packages = if args.targets.is_empty() {
        ctx.installed.packages().cloned().collect()
    } else {
        common::resolve_installed_packages(&ctx.installed, &args.targets)?
    };
    let plan = anvil_resolver::upgrade(&ctx.installed, &ctx.available, packages)?;

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
        anvil_executor::uninstall_one(&ctx.config, &mut ctx.installed, &package, false)?;
    }
    let to_install = common::install_order(&plan.to_install);
    anvil_fetcher::download(&ctx.config, &to_install)?;
    for package in to_install {
        let archive_path = common::cached_archive_path(&ctx.config, &package);
        let archive_path = archive_path.is_file().then_some(archive_path.as_path());
        anvil_executor::install_one(&ctx.config, &mut ctx.installed, package, archive_path)?;
    }
    output::status("done.");
    Ok(())
}
