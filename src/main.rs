//! plotmgr CLI entry point
//!
//! Parses arguments, installs the log subscriber, runs the command and turns failures into
//! a readable report with exit code 1.
//!
//! Commands:
//! - `create` - Produce plots from a plot file and an input-file registry
//! - `find` - List the plots of a plot file that match the selectors
//! - `inputs` - Maintain an input-file registry

use anyhow::Result;
use clap::Parser;
use plotmgr_cli::cli;
use plotmgr_cli::core::error::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    cli.init_logging();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
