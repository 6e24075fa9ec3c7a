//! Configuration management for plotmgr
//!
//! # Configuration File (`~/.plotmgr/config.toml`)
//!
//! Controls where plots are written, whether they are batched into an archive, and how
//! input files are classified and parsed. All settings are optional.
//!
//! ## Location Priority
//!
//! 1. `--config <path>` on the command line
//! 2. `$PLOTMGR_CONFIG`
//! 3. `~/.plotmgr/config.toml`
//! 4. Default values
//!
//! # Modules
//!
//! - `global` - the [`Config`] structure and its loader
//! - `parser` - generic TOML parsing with path context

mod global;
mod parser;

pub use global::{Config, FileKind, TabularSettings};
pub use parser::parse_config;
