//! Plot generation through the manager.

use plotmgr_cli::config::Config;
use plotmgr_cli::constants::TEMPLATE_GROUP;
use plotmgr_cli::core::PlotError;
use plotmgr_cli::manager::{PlotManager, ReadMode};
use plotmgr_cli::output::{OutputMode, SummaryRenderer};
use plotmgr_cli::plot::{Plot, PlotSelector};
use plotmgr_cli::test_utils::capture_logs;
use std::io::Read;

use crate::common::{TestProject, spectra_plot};

fn manager(project: &TestProject, mode: OutputMode) -> PlotManager {
    let config = Config {
        output_dir: project.path().join("plots").display().to_string(),
        output_mode: mode,
        ..Config::default()
    };
    let mut manager = PlotManager::new(config);
    manager
        .add_input_files(
            "A",
            vec![project.file_a().display().to_string(), format!("{}:sub", project.file_b().display())],
        )
        .unwrap();
    manager
}

#[test]
fn test_template_axis_title_is_inherited() {
    let project = TestProject::new();
    let mut manager = manager(&project, OutputMode::Directory);

    let mut template = Plot::new("T1", TEMPLATE_GROUP);
    template.set_axis_title("X", "pT");
    manager.add_template(template).unwrap();

    let mut plot = spectra_plot("pt", &["hist1"]);
    plot.set_template("T1");
    manager.add_plot(plot).unwrap();

    let report = manager.create_plots(&PlotSelector::all(), &SummaryRenderer).unwrap();
    assert_eq!(report.created, vec!["pt_IN_spectra:pp"]);

    let written = project.path().join("plots/spectra/pp/pt.json");
    let json: serde_json::Value = serde_json::from_slice(&std::fs::read(written).unwrap()).unwrap();
    assert_eq!(json["pads"][0]["axes"]["X"]["title"], "pT");
    assert_eq!(json["template"], "T1");
}

#[test]
fn test_generating_twice_keeps_one_ledger_entry() {
    let project = TestProject::new();
    let mut manager = manager(&project, OutputMode::Directory);
    manager.add_plot(spectra_plot("pt", &["hist1"])).unwrap();

    let (first, logs) = capture_logs(|| manager.create_plot("pt", "spectra:pp", &SummaryRenderer));
    assert!(first.unwrap().is_success());
    assert_eq!(logs.warnings(), 0);

    let (second, logs) = capture_logs(|| manager.create_plot("pt", "spectra:pp", &SummaryRenderer));
    assert!(second.unwrap().is_success());
    assert_eq!(logs.warnings(), 1);
    assert!(logs.output().contains("Plot pt_IN_spectra:pp was already created. Replacing it."));

    assert_eq!(manager.ledger().len(), 1);
    assert_eq!(manager.ledger().history(), ["pt_IN_spectra:pp"]);
}

#[test]
fn test_ratio_needs_both_inputs() {
    let project = TestProject::new();
    let mut manager = manager(&project, OutputMode::Directory);

    let mut ratio = Plot::new("ratio", "spectra:pp");
    ratio.add_ratio("hist1", "A", "hist1", "B");
    manager.add_plot(ratio).unwrap();
    manager.add_plot(spectra_plot("nested", &["hist2"])).unwrap();

    let report = manager.create_plots(&PlotSelector::all(), &SummaryRenderer).unwrap();
    assert_eq!(report.failed, vec!["ratio_IN_spectra:pp"]);
    assert_eq!(report.created, vec!["nested_IN_spectra:pp"]);

    // the numerator is loaded even though the plot failed
    assert!(manager.data().contains("hist1_@_A"));
    assert!(manager.data().contains("hist2_@_A"));
}

#[test]
fn test_template_group_is_reserved() {
    let project = TestProject::new();
    let mut manager = manager(&project, OutputMode::Directory);
    let result = manager.add_plot(Plot::new("pt", TEMPLATE_GROUP));
    assert!(matches!(result, Err(PlotError::ReservedGroupName { .. })));
}

#[test]
fn test_archive_mode_round_trip() {
    let project = TestProject::new();
    let mut manager = manager(&project, OutputMode::Archive);
    manager.add_plot(spectra_plot("pt", &["hist1"])).unwrap();
    let mut yields = spectra_plot("yield.v2", &["hist3"]);
    yields.set_plot_style("default");
    manager.add_plot(yields).unwrap();

    let report = manager.create_plots(&PlotSelector::new(&["spectra:pp"], &[]).unwrap(), &SummaryRenderer).unwrap();
    assert_eq!(report.created.len(), 2);
    let archive_path = manager.finish().unwrap().unwrap();

    let mut archive = zip::ZipArchive::new(std::fs::File::open(archive_path).unwrap()).unwrap();
    let mut content = String::new();
    archive.by_name("spectra/pp/yield_v2.json").unwrap().read_to_string(&mut content).unwrap();
    assert!(content.contains("\"plotStyle\": \"default\""));
}

#[test]
fn test_plot_file_round_trip_through_manager() {
    let project = TestProject::new();
    let plot_file = project.path().join("plots.toml");

    {
        let mut writer = manager(&project, OutputMode::Directory);
        writer.add_plot(spectra_plot("pt", &["hist1"])).unwrap();
        writer.add_plot(spectra_plot("eta", &["hist3"])).unwrap();
        writer.dump_plots(&plot_file, &PlotSelector::all()).unwrap();
    }

    let mut reader = manager(&project, OutputMode::Directory);
    let selector = PlotSelector::new::<&str>(&[], &["e.*"]).unwrap();
    let loaded = reader.read_plot_file(&plot_file, &selector, ReadMode::Load).unwrap();
    assert_eq!(loaded, vec!["eta_IN_spectra:pp"]);

    let report = reader.create_plots(&PlotSelector::all(), &SummaryRenderer).unwrap();
    assert_eq!(report.created, vec!["eta_IN_spectra:pp"]);
    assert!(project.path().join("plots/spectra/pp/eta.json").is_file());
}
