//! Configuration: enabled architectures, the repository table, db and root
//! paths, and the unit-allowed policy derived from them.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod types;
pub mod validate;

pub use loader::load;
pub use types::{Architectures, Configuration, RepositoryEntry};
pub use validate::validate;
