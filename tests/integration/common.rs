//! Shared fixtures for the integration tests.

use assert_cmd::Command;
use plotmgr_cli::extractor::PendingRequest;
use plotmgr_cli::plot::Plot;
use plotmgr_cli::registry::{DataKey, NameRegistry};
use plotmgr_cli::test_utils::DirectoryBuilder;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project with input files, an empty config and helpers to run the binary.
pub struct TestProject {
    pub temp: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.toml"), "").unwrap();
        Self {
            temp,
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// `fileA.json` with `hist1` and `hist3` at the top level.
    pub fn file_a(&self) -> PathBuf {
        DirectoryBuilder::root().graph("hist1", 3).graph("hist3", 2).write(&self.path().join("fileA.json")).unwrap()
    }

    /// `fileB.json` with `hist2` only inside `sub`.
    pub fn file_b(&self) -> PathBuf {
        DirectoryBuilder::root()
            .graph("unrelated", 1)
            .directory(DirectoryBuilder::new("sub").graph("hist2", 4))
            .write(&self.path().join("fileB.json"))
            .unwrap()
    }

    /// `plotmgr` with an isolated configuration and output directory.
    pub fn plotmgr(&self) -> Command {
        let mut cmd = Command::cargo_bin("plotmgr").unwrap();
        cmd.current_dir(self.path())
            .env_remove("PLOTMGR_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.path().join("config.toml"));
        cmd
    }
}

/// Pending request for `name` of `source` with the standard target name.
pub fn request(names: &mut NameRegistry, name: &str, source: &str) -> PendingRequest {
    PendingRequest {
        name: name.to_string(),
        target: format!("{name}_@_{source}"),
        key: DataKey::new(names.get_or_create_id(name), names.get_or_create_id(source)),
    }
}

/// A plot in `spectra:pp` drawing `data` from input `A`.
pub fn spectra_plot(name: &str, data: &[&str]) -> Plot {
    let mut plot = Plot::new(name, "spectra:pp");
    for dataset in data {
        plot.add_data(dataset, "A");
    }
    plot
}
