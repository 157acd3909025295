//! Registry and loader: ingest metadata files from disk, build the
//! available and installed [`anvil_core::Set`]s, and detect name conflicts
//! across the three unit namespaces along the way.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod registry;

pub use loader::{load_available, load_installed};
pub use registry::{ingest, Registration, Registry};
