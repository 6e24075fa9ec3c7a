//! Command-line interface for plotmgr.
//!
//! # Available Commands
//!
//! - `create` - Load plots from a plot file, resolve their data and produce them
//! - `find` - List the plots of a plot file matching the selectors
//! - `inputs add` / `inputs list` - Maintain an input-file registry
//!
//! # Example
//!
//! ```bash
//! # Register the candidate files of two input identifiers
//! plotmgr inputs add --file inputs.toml pp13TeV ~/data/AnalysisResults.json:pp
//! plotmgr inputs add --file inputs.toml ref ~/data/published.csv
//!
//! # Which spectra plots are defined?
//! plotmgr find --plots plots.toml --group 'spectra:pp.*'
//!
//! # Produce them into one archive
//! plotmgr create --plots plots.toml --inputs inputs.toml --group spectra --mode archive
//! ```
//!
//! # Global Options
//!
//! - `--verbose` - Debug output
//! - `--quiet` - Errors only
//! - `--config` - Path to a configuration file (default `~/.plotmgr/config.toml`)

pub mod common;
mod create;
mod find;
mod inputs;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Main CLI structure for plotmgr.
#[derive(Parser)]
#[command(
    name = "plotmgr",
    about = "Resolve plot definitions into datasets and produce the plots",
    version,
    author,
    long_about = "plotmgr finds the datasets a batch of plot definitions needs inside hierarchical \
                  input files and delimited tables, and produces every plot whose data is complete."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output.
    ///
    /// Shows which files are searched and which datasets are found where. Mutually
    /// exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a configuration file.
    ///
    /// Overrides `$PLOTMGR_CONFIG` and `~/.plotmgr/config.toml`.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce plots from a plot file.
    ///
    /// See [`create::CreateCommand`].
    Create(create::CreateCommand),

    /// List the plots of a plot file that match the selectors.
    Find(find::FindCommand),

    /// Maintain an input-file registry.
    Inputs(inputs::InputsCommand),
}

impl Cli {
    /// Log filter for the chosen verbosity.
    ///
    /// `--verbose` selects `debug`, `--quiet` selects `error`. Otherwise `RUST_LOG` applies,
    /// falling back to `info`.
    #[must_use]
    pub fn log_filter(&self) -> EnvFilter {
        if self.verbose {
            EnvFilter::new("debug")
        } else if self.quiet {
            EnvFilter::new("error")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        }
    }

    /// Install the log subscriber. Logs go to stderr.
    pub fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.log_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Run the selected command.
    pub fn execute(self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        match self.command {
            Commands::Create(cmd) => cmd.execute(config),
            Commands::Find(cmd) => cmd.execute(config),
            Commands::Inputs(cmd) => cmd.execute(),
        }
    }
}
