//! List the plots of a plot file that match the selectors.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::common::SelectionArgs;
use crate::config::Config;
use crate::manager::{PlotManager, ReadMode};

#[derive(Args)]
pub struct FindCommand {
    /// Plot definition file
    #[arg(short, long, value_name = "FILE")]
    plots: PathBuf,

    #[command(flatten)]
    selection: SelectionArgs,
}

impl FindCommand {
    pub fn execute(self, config: Config) -> Result<()> {
        let selector = self.selection.selector()?;
        let mut manager = PlotManager::new(config);
        let found = manager.read_plot_file(&self.plots, &selector, ReadMode::Find)?;

        if found.is_empty() {
            println!("No matching plots in {}", self.plots.display());
            return Ok(());
        }
        println!("{}", format!("Found {} plot(s):", found.len()).bold());
        for name in found {
            println!("  {name}");
        }
        Ok(())
    }
}
