//! The `Chooser` interface: how the resolver picks a provider when a
//! virtual package has more than one.

use anvil_core::PackageKey;

/// Policy for resolving a virtual package to one of its providers.
///
/// Lifting the prompt behind this trait keeps the resolver free of I/O —
/// an interactive implementation (asking the user for an index) lives at
/// the CLI layer; tests and non-interactive callers use
/// [`FirstAvailableChooser`].
pub trait Chooser {
    fn choose(&self, virtual_name: &str, providers: &[PackageKey]) -> usize;
}

/// Always picks the first provider in the virtual's provider list. Useful
/// for tests and for non-interactive invocations.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstAvailableChooser;

impl Chooser for FirstAvailableChooser {
    fn choose(&self, _virtual_name: &str, _providers: &[PackageKey]) -> usize {
        0
    }
}
