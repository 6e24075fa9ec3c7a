//! Process-lifetime registries owned by the plot manager.
//!
//! - [`NameRegistry`]: interns dataset names and input identifiers to [`NameId`]s
//! - [`DataRegistry`]: owns every extracted dataset under its unique name

pub mod data;
pub mod names;

pub use data::{DataKey, DataRegistry};
pub use names::{NameId, NameRegistry};
