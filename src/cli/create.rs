//! Produce plots from a plot file.
//!
//! Plots matching the selectors are loaded from the plot file (templates always are), their
//! datasets are resolved through the input-file registry, and every complete plot is
//! rendered with the JSON summary renderer. The command fails if any selected plot could
//! not be produced or a requested name does not exist.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::common::SelectionArgs;
use crate::config::Config;
use crate::core::user_friendly_error;
use crate::manager::{PlotManager, ReadMode};
use crate::output::{OutputMode, SummaryRenderer};

#[derive(Args)]
pub struct CreateCommand {
    /// Plot definition file
    #[arg(short, long, value_name = "FILE")]
    plots: PathBuf,

    /// Input-file registry
    #[arg(short, long, value_name = "FILE")]
    inputs: PathBuf,

    #[command(flatten)]
    selection: SelectionArgs,

    /// Write one file per plot or a single archive
    #[arg(short, long, value_enum)]
    mode: Option<OutputMode>,

    /// Output directory, overrides the configuration
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Name output files after the unique plot name
    #[arg(long)]
    unique_names: bool,
}

impl CreateCommand {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(mode) = self.mode {
            config.output_mode = mode;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir.clone_from(dir);
        }
        if self.unique_names {
            config.use_unique_plot_names = true;
        }
        config
    }

    pub fn execute(self, config: Config) -> Result<()> {
        let config = self.apply(config);
        let selector = self.selection.selector()?;

        let mut manager = PlotManager::new(config);
        manager.load_input_files(&self.inputs)?;
        let loaded = manager.read_plot_file(&self.plots, &selector, ReadMode::Load)?;
        if loaded.is_empty() {
            println!("{}", "No plots matched the selectors".yellow());
        }

        let report = manager.create_plots(&selector, &SummaryRenderer)?;
        let output = manager.config().output_path()?;
        let archive = manager.finish()?;

        match archive {
            Some(path) => {
                println!("{} Created {} plot(s) in {}", "✓".green(), report.created.len(), path.display());
            }
            None => {
                println!("{} Created {} plot(s) in {}", "✓".green(), report.created.len(), output.display());
            }
        }
        for name in &report.failed {
            println!("  {} {}", "✗".red(), name);
        }
        for error in &report.unresolved {
            user_friendly_error(error.clone().into()).display();
        }

        if !report.failed.is_empty() {
            bail!("{} plot(s) could not be created", report.failed.len());
        }
        if !report.not_found.is_empty() {
            bail!("Plot(s) not defined: {}", report.not_found.join(", "));
        }
        Ok(())
    }
}
