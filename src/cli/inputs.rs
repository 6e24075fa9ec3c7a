//! Maintain an input-file registry.
//!
//! ```bash
//! plotmgr inputs add --file inputs.toml pp13TeV data.json:pp more.json
//! plotmgr inputs list --file inputs.toml
//! ```
//!
//! `add` replaces the files of an identifier that is already registered.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::source::InputFiles;

#[derive(Args)]
pub struct InputsCommand {
    #[command(subcommand)]
    command: InputsSubcommand,
}

#[derive(Subcommand)]
enum InputsSubcommand {
    /// Register the candidate files of an input identifier
    Add {
        /// Registry file, created if missing
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        /// Input identifier
        identifier: String,

        /// File references `path[:sub/path]`, searched in this order
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Show every registered identifier and its files
    List {
        /// Registry file
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },
}

impl InputsCommand {
    pub fn execute(self) -> Result<()> {
        match self.command {
            InputsSubcommand::Add {
                file,
                identifier,
                paths,
            } => {
                let mut inputs = if file.exists() {
                    InputFiles::load(&file)?
                } else {
                    InputFiles::new()
                };
                let count = paths.len();
                inputs.add_files(&identifier, paths)?;
                inputs.save(&file)?;
                println!("{} Registered {} file(s) for {}", "✓".green(), count, identifier.bold());
                Ok(())
            }
            InputsSubcommand::List {
                file,
            } => {
                let inputs = InputFiles::load(&file)?;
                if inputs.is_empty() {
                    println!("No input identifiers registered in {}", file.display());
                    return Ok(());
                }
                for (identifier, files) in inputs.iter() {
                    println!("{}", identifier.bold());
                    for path in files {
                        println!("  {path}");
                    }
                }
                Ok(())
            }
        }
    }
}
