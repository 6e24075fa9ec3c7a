//! Tests of the `plotmgr` binary.

use plotmgr_cli::config::Config;
use plotmgr_cli::manager::PlotManager;
use plotmgr_cli::plot::{Plot, PlotSelector};
use predicates::prelude::*;
use std::path::PathBuf;

use crate::common::{TestProject, spectra_plot};

/// Write `plots.toml` with a complete plot and one that needs a missing dataset.
fn write_plot_file(project: &TestProject) -> PathBuf {
    let path = project.path().join("plots.toml");
    let mut manager = PlotManager::new(Config::default());
    manager.add_plot(spectra_plot("pt", &["hist1"])).unwrap();
    manager.add_plot(spectra_plot("missing", &["hist9"])).unwrap();
    let mut other = Plot::new("eta", "yields");
    other.add_data("hist3", "A");
    manager.add_plot(other).unwrap();
    manager.dump_plots(&path, &PlotSelector::all()).unwrap();
    path
}

fn register_inputs(project: &TestProject) {
    let file_a = project.file_a();
    project
        .plotmgr()
        .args(["inputs", "add", "--file", "inputs.toml", "A"])
        .arg(file_a)
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered 1 file(s)"));
}

#[test]
fn test_inputs_add_and_list() {
    let project = TestProject::new();
    register_inputs(&project);
    project
        .plotmgr()
        .args(["inputs", "add", "--file", "inputs.toml", "B", "x.json:sub", "y.csv"])
        .assert()
        .success();

    project
        .plotmgr()
        .args(["inputs", "list", "--file", "inputs.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fileA.json"))
        .stdout(predicate::str::contains("x.json:sub"));
}

#[test]
fn test_inputs_reject_reserved_separator() {
    let project = TestProject::new();
    project
        .plotmgr()
        .args(["inputs", "add", "--file", "inputs.toml", "bad_@_id", "a.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("_@_"));
}

#[test]
fn test_find_lists_matching_plots() {
    let project = TestProject::new();
    write_plot_file(&project);

    project
        .plotmgr()
        .args(["find", "--plots", "plots.toml", "--group", "spectra"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 plot(s)"))
        .stdout(predicate::str::contains("pt_IN_spectra:pp"))
        .stdout(predicate::str::contains("eta_IN_yields").not());
}

#[test]
fn test_find_rejects_double_colon_selector() {
    let project = TestProject::new();
    write_plot_file(&project);

    project
        .plotmgr()
        .args(["find", "--plots", "plots.toml", "--group", "a:b:c"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("more than one ':'"));
}

#[test]
fn test_create_writes_complete_plots() {
    let project = TestProject::new();
    write_plot_file(&project);
    register_inputs(&project);

    project
        .plotmgr()
        .args(["create", "--plots", "plots.toml", "--inputs", "inputs.toml", "--name", "pt", "--name", "eta"])
        .args(["--output-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created 2 plot(s)"));

    assert!(project.path().join("out/spectra/pp/pt.json").is_file());
    assert!(project.path().join("out/yields/eta.json").is_file());
}

#[test]
fn test_create_fails_for_missing_data() {
    let project = TestProject::new();
    write_plot_file(&project);
    register_inputs(&project);

    project
        .plotmgr()
        .args(["create", "--plots", "plots.toml", "--inputs", "inputs.toml", "--group", "spectra"])
        .args(["--mode", "archive", "--output-dir", "out"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("missing_IN_spectra:pp"))
        .stderr(predicate::str::contains("hist9"))
        .stderr(predicate::str::contains("1 plot(s) could not be created"));

    assert!(project.path().join("out/ResultPlots.zip").is_file());
}

#[test]
fn test_create_requires_input_registry() {
    let project = TestProject::new();
    write_plot_file(&project);

    project
        .plotmgr()
        .args(["create", "--plots", "plots.toml", "--inputs", "absent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.toml"));
}
