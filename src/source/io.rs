//! Persistence of the input-file registry.
//!
//! The registry is stored as TOML with one table per identifier:
//!
//! ```toml
//! [pp13TeV]
//! files = ["~/data/AnalysisResults.json:pp/spectra", "~/data/published.csv"]
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::InputFiles;
use crate::utils::atomic_write;

impl InputFiles {
    /// Load a registry file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is not valid TOML, or contains an identifier with a
    /// reserved separator.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read input file registry: {}", path.display()))?;

        if content.trim().is_empty() {
            return Ok(Self::new());
        }

        let parsed: Self = toml::from_str(&content)
            .map_err(crate::core::PlotError::from)
            .with_context(|| format!("Invalid TOML syntax in input file registry: {}", path.display()))?;

        // route through add_files so identifiers get validated
        let mut inputs = Self::new();
        inputs.extend(parsed)?;
        Ok(inputs)
    }

    /// Save the registry, replacing the file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize input file registry")?;
        atomic_write(path, content.as_bytes())
            .with_context(|| format!("Cannot write input file registry: {}", path.display()))
    }
}
