//! Core types shared across anvil: the unit model, the relationship and
//! version DSLs, YAML (de)serialization, and the error type every other
//! crate in the workspace propagates.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod identifier;
pub mod relationship;
pub mod set;
pub mod unit;
pub mod version;
pub mod yaml;

pub use error::{Error, Result};
pub use relationship::{Op, Relationship};
pub use set::Set;
pub use unit::{
    FLAG_INSTALLED_AS_DEPENDENCY, FLAG_INSTALLED_BY_USER, Files, Group, Information, MetadataMap, Package,
    PackageData, PackageKey, PackageMetadata, Unit, VirtualPackage, build_metadata_map, flatten_metadata_map,
};
pub use version::Version;

// Re-exported map/set/lock vocabulary used throughout the workspace. The
// scheduling model is single-threaded (see the concurrency notes), but
// these types keep call sites uniform with the rest of the corpus.
pub use ahash::{AHashMap, AHashSet};
pub use dashmap::DashMap;
pub use parking_lot::{Mutex, RwLock};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;
