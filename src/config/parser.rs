//! Generic TOML file parsing.
//!
//! Shared by the configuration loader and the plot definition reader. Read failures and
//! syntax errors carry the file path in their context.
//!
//! ```rust,no_run
//! use plotmgr_cli::config::{Config, parse_config};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config: Config = parse_config(Path::new("config.toml"))?;
//! println!("Writing to {}", config.output_dir);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::Path;

use crate::core::PlotError;

/// Parse a TOML file into `T`.
///
/// # Errors
///
/// Fails if the file cannot be read or does not deserialize into `T`. The TOML error is kept
/// as a [`PlotError::TomlError`] at the root of the chain.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&content)
        .map_err(PlotError::from)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
