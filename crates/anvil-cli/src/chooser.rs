//! The interactive virtual-package provider chooser: prompts the user for
//! an index via a select menu. Falls back to the first provider when not a
//! tty or when the prompt itself fails.

use anvil_core::PackageKey;
use anvil_resolver::{Chooser, FirstAvailableChooser};
use dialoguer::Select;
use std::io::IsTerminal;

#[derive(Debug, Default)]
pub struct PromptChooser;

impl Chooser for PromptChooser {
    fn choose(&self, virtual_name: &str, providers: &[PackageKey]) -> usize {
        if !std::io::stdin().is_terminal() || providers.len() <= 1 {
            return FirstAvailableChooser.choose(virtual_name, providers);
        }

        let items: Vec<String> = providers.iter().map(ToString::to_string).collect();
        Select::new()
            .with_prompt(format!("multiple packages provide '{virtual_name}', pick one"))
            .items(&items)
            .default(0)
            .interact()
            .unwrap_or(0)
    }
}
