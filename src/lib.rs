//! plotmgr - resolve plot definitions into datasets and extract them from input files
//!
//! A plot definition names the datasets it draws as `(name, input identifier)` pairs. An
//! input identifier is a label for one logical data source that maps to an ordered list of
//! candidate files. plotmgr collects what a batch of plots needs, searches the candidate
//! files of every identifier once, moves the found datasets into an in-memory registry under
//! unique names, and hands each complete plot to a renderer. Produced artifacts are recorded
//! in a ledger and written to an output directory or a zip archive.
//!
//! # Architecture Overview
//!
//! ```text
//! plots ──► requirements ──► per-identifier work lists
//!                                   │
//!                                   ▼
//!       source::locator ──► extractor ──► registry::DataRegistry
//!                                                  │
//!       plot::merge (templates) ◄──────────────────┘
//!               │
//!               ▼
//!       output::Renderer ──► ledger ──► directory / archive
//! ```
//!
//! # Core Modules
//!
//! ## Resolution
//! - [`registry`] - Name ids and the registry of loaded datasets
//! - [`source`] - Input identifiers, file references and the container locator
//! - [`extractor`] - Recursive extraction and cross-file resolution
//! - [`requirements`] - What a batch of plots needs, and whether a plot can be drawn
//! - [`tabular`] - Delimited text tables
//!
//! ## Plots and output
//! - [`plot`] - Plot model, template merge, selection and TOML plot files
//! - [`output`] - Renderer contract, artifacts and output sinks
//! - [`ledger`] - Produced artifacts, history and archive flushing
//! - [`manager`] - The session context tying everything together
//!
//! ## Supporting Modules
//! - [`data`] - Hierarchical container files and datasets
//! - [`config`] - Global configuration (`~/.plotmgr/config.toml`)
//! - [`core`] - Error types and user-facing error reports
//! - [`cli`] - Command-line interface
//! - [`utils`] - File system helpers
//!
//! # Unique Names
//!
//! Datasets are stored as `name_@_identifier`, plots as `name_IN_group[:category]`. Neither
//! separator may appear inside a raw name or identifier.
//!
//! # Example
//!
//! ```rust,no_run
//! use plotmgr_cli::config::Config;
//! use plotmgr_cli::manager::PlotManager;
//! use plotmgr_cli::output::SummaryRenderer;
//! use plotmgr_cli::plot::{Plot, PlotSelector};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut manager = PlotManager::new(Config::default());
//! manager.add_input_files("pp13TeV", vec!["~/data/AnalysisResults.json:pp".to_string()])?;
//!
//! let mut plot = Plot::new("pt_spectrum", "spectra:pp");
//! plot.add_data("hist1", "pp13TeV");
//! manager.add_plot(plot)?;
//!
//! let report = manager.create_plots(&PlotSelector::all(), &SummaryRenderer)?;
//! println!("created {} plot(s)", report.created.len());
//! manager.finish()?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;

// Resolution
pub mod data;
pub mod extractor;
pub mod registry;
pub mod requirements;
pub mod source;
pub mod tabular;

// Plots and output
pub mod ledger;
pub mod manager;
pub mod output;
pub mod plot;

pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
