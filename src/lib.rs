//! Workspace placeholder crate.
//!
//! This crate exists so host applications can depend on a single package and
//! reach every workspace crate (`bridge-traits`, `core-runtime`,
//! `core-player`) without wiring each path dependency individually.

pub use bridge_traits;
pub use core_player;
pub use core_runtime;
