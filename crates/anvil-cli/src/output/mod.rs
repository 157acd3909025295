//! Terminal output: a plan table for planning operations, plain lines for
//! `search`, and a status line for everything else.

pub mod table;

use anvil_core::Unit;
use anvil_resolver::Plan;
use std::io::IsTerminal;
use table::Table;

/// Whether output should fall back to plain lines: either forced via
/// `--plain`, or stdout is not a tty.
#[must_use]
pub fn use_plain(force_plain: bool) -> bool {
    force_plain || !std::io::stdout().is_terminal()
}

/// Render a resolver [`Plan`] as a table of packages to install/uninstall.
pub fn render_plan(plan: &Plan, plain: bool) {
    if plan.is_empty() {
        println!("Nothing to do.");
        return;
    }

    let mut table = Table::new(&["action", "package", "version", "architecture"]);
    for unit in plan.to_install.iter() {
        if let Unit::Package(p) = unit {
            table.push(vec!["install".into(), p.name.clone(), p.version.clone(), p.architecture.clone()]);
        }
    }
    for unit in plan.to_uninstall.iter() {
        if let Unit::Package(p) = unit {
            table.push(vec!["remove".into(), p.name.clone(), p.version.clone(), p.architecture.clone()]);
        }
    }
    print!("{}", table.render(plain));

    for note in &plan.notes {
        println!("note: {note}");
    }
}

/// Render search results as a plain list: one `name(arch) version` per line.
pub fn render_search_results(units: &[&Unit]) {
    for unit in units {
        println!("{}", unit.display_identity());
    }
}

/// Print a one-line status message for non-planning operations.
pub fn status(message: &str) {
    println!("{message}");
}
