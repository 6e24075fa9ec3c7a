//! Utility helpers.
//!
//! - [`fs`]: directory creation, atomic writes and path expansion

pub mod fs;

pub use fs::{atomic_write, ensure_dir, expand_path};
