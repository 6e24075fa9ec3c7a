//! Extraction and cross-file resolution against container files on disk.

use plotmgr_cli::config::Config;
use plotmgr_cli::data::io::open_container_file;
use plotmgr_cli::data::{Container, Object};
use plotmgr_cli::extractor::{extract, resolve_source};
use plotmgr_cli::registry::{DataRegistry, NameRegistry};
use plotmgr_cli::source::locator::locate;
use plotmgr_cli::test_utils::{DirectoryBuilder, init_test_logging, write_table};

use crate::common::{TestProject, request};

#[test]
fn test_top_level_dataset_is_moved_into_registry() {
    init_test_logging(None);
    let project = TestProject::new();
    let path = project.file_a();

    let mut names = NameRegistry::new();
    let mut registry = DataRegistry::new();
    let mut root = Object::Directory(open_container_file(&path).unwrap());
    let mut pending = vec![request(&mut names, "hist1", "A")];

    assert_eq!(extract(&mut root, &mut pending, &mut registry), 1);
    assert!(pending.is_empty());
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("hist1_@_A").unwrap().name(), "hist1_@_A");

    let container = root.as_container_mut().unwrap();
    assert!(!container.contains("hist1"));
    assert!(container.contains("hist3"));

    // a second pass over the depleted container finds nothing
    let mut again = vec![request(&mut names, "hist1", "A")];
    assert_eq!(extract(&mut root, &mut again, &mut registry), 0);
    assert_eq!(again.len(), 1);
}

#[test]
fn test_nested_dataset_leaves_top_level_untouched() {
    let project = TestProject::new();
    let path = project.file_b();

    let mut names = NameRegistry::new();
    let mut registry = DataRegistry::new();
    let mut root = Object::Directory(open_container_file(&path).unwrap());
    let mut pending = vec![request(&mut names, "sub/hist2", "B")];

    let sub = locate(&mut root, &["sub".to_string()]).unwrap();
    assert_eq!(extract(sub, &mut pending, &mut registry), 1);
    assert!(registry.contains("sub/hist2_@_B"));

    let container = root.as_container_mut().unwrap();
    assert_eq!(container.child_names(), vec!["unrelated", "sub"]);
}

#[test]
fn test_missing_dataset_across_two_files() {
    let project = TestProject::new();
    let first = project.file_a().display().to_string();
    let second = project.file_b().display().to_string();

    let mut names = NameRegistry::new();
    let mut registry = DataRegistry::new();
    let outcome = resolve_source(
        "A",
        &[first.clone(), second.clone()],
        vec![request(&mut names, "hist1", "A"), request(&mut names, "hist9", "A")],
        &Config::default(),
        &mut registry,
    );

    assert!(registry.contains("hist1_@_A"));
    assert_eq!(outcome.matched, 1);
    assert_eq!(outcome.unresolved.len(), 1);
    assert_eq!(outcome.unresolved[0].name, "hist9");

    let report = outcome.report();
    assert!(report.contains("hist9 (A)"));
    assert!(!report.contains("hist1 (A)"));
    assert!(report.contains(&first));
    assert!(report.contains(&second));
}

#[test]
fn test_second_file_provides_fallback() {
    let project = TestProject::new();
    let first = project.file_a().display().to_string();
    let second = project.file_b().display().to_string();

    let mut names = NameRegistry::new();
    let mut registry = DataRegistry::new();
    let outcome = resolve_source(
        "B",
        &[first, format!("{second}:sub")],
        vec![request(&mut names, "hist2", "B")],
        &Config::default(),
        &mut registry,
    );
    assert!(outcome.is_complete());
    assert!(registry.contains("hist2_@_B"));
}

#[test]
fn test_lists_and_tables_share_one_registry() {
    let project = TestProject::new();
    let container = DirectoryBuilder::root()
        .list("results", &["yield", "ratio"])
        .write(&project.path().join("lists.json"))
        .unwrap();
    let table = write_table(&project.path().join("published.csv"), &[[1.0, 2.0, 0.0, 0.1], [2.0, 3.0, 0.0, 0.2]])
        .unwrap();

    let mut names = NameRegistry::new();
    let mut registry = DataRegistry::new();
    let outcome = resolve_source(
        "ref",
        &[container.display().to_string(), table.display().to_string()],
        vec![request(&mut names, "ratio", "ref"), request(&mut names, "published", "ref")],
        &Config::default(),
        &mut registry,
    );

    assert!(outcome.is_complete());
    assert!(registry.contains("ratio_@_ref"));
    assert_eq!(registry.get("published_@_ref").unwrap().len(), 2);
}

#[test]
fn test_name_ids_are_stable() {
    let mut names = NameRegistry::new();
    let id = names.get_or_create_id("hist1");
    assert_eq!(names.get_or_create_id("hist1"), id);
    assert_eq!(names.name(id), Some("hist1"));
}
