//! Which datasets a batch of plots needs, and whether a plot can be drawn.
//!
//! [`compute_required`] collects every dataset referenced by the selected plots (ratio
//! denominators included) that is not loaded yet, grouped by input identifier. The result
//! is consumed by one extraction batch and then discarded.
//!
//! [`is_renderable`] runs after extraction: a plot can only be drawn if every dataset it
//! references is present in the registry under its unique name.

use std::collections::{BTreeMap, BTreeSet};

use crate::plot::Plot;
use crate::registry::{DataKey, DataRegistry, NameId, NameRegistry};

/// Input identifier id → ids of the dataset names still to be read.
pub type RequiredData = BTreeMap<NameId, BTreeSet<NameId>>;

/// Collect the datasets `plots` need that `loaded` does not hold yet.
pub fn compute_required<'a>(
    plots: impl IntoIterator<Item = &'a Plot>,
    names: &mut NameRegistry,
    loaded: &DataRegistry,
) -> RequiredData {
    let mut required = RequiredData::new();
    for plot in plots {
        for reference in plot.data_refs() {
            let key = DataKey::new(names.get_or_create_id(reference.name), names.get_or_create_id(reference.input));
            if !loaded.is_loaded(key) {
                required.entry(key.source).or_default().insert(key.name);
            }
        }
    }
    required
}

/// Unique names of the datasets `plot` references but `registry` lacks.
#[must_use]
pub fn missing_data(plot: &Plot, registry: &DataRegistry) -> Vec<String> {
    plot.data_refs().map(|r| r.unique_name()).filter(|unique| !registry.contains(unique)).collect()
}

/// Whether every dataset `plot` references is in `registry`.
#[must_use]
pub fn is_renderable(plot: &Plot, registry: &DataRegistry) -> bool {
    plot.data_refs().all(|r| registry.contains(&r.unique_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;

    fn ratio_plot() -> Plot {
        let mut plot = Plot::new("ratio", "A");
        plot.add_data("hist1", "A");
        plot.add_ratio("hist1", "A", "hist1", "B");
        plot
    }

    #[test]
    fn test_denominators_are_required() {
        let mut names = NameRegistry::new();
        let registry = DataRegistry::new();
        let required = compute_required([&ratio_plot()], &mut names, &registry);

        let a = names.id("A").unwrap();
        let b = names.id("B").unwrap();
        let hist1 = names.id("hist1").unwrap();
        assert_eq!(required.len(), 2);
        assert_eq!(required[&a], BTreeSet::from([hist1]));
        assert_eq!(required[&b], BTreeSet::from([hist1]));
    }

    #[test]
    fn test_loaded_data_is_skipped() {
        let mut names = NameRegistry::new();
        let mut registry = DataRegistry::new();
        let key = DataKey::new(names.get_or_create_id("hist1"), names.get_or_create_id("A"));
        registry.insert(key, "hist1_@_A", Dataset::graph("hist1", vec![]));

        let required = compute_required([&ratio_plot()], &mut names, &registry);
        assert_eq!(required.len(), 1);
        assert!(required.contains_key(&names.id("B").unwrap()));
    }

    #[test]
    fn test_renderability_is_stable() {
        let mut names = NameRegistry::new();
        let mut registry = DataRegistry::new();
        let plot = ratio_plot();

        let key = DataKey::new(names.get_or_create_id("hist1"), names.get_or_create_id("A"));
        registry.insert(key, "hist1_@_A", Dataset::graph("hist1", vec![]));
        assert!(!is_renderable(&plot, &registry));
        assert!(!is_renderable(&plot, &registry));
        assert_eq!(missing_data(&plot, &registry), vec!["hist1_@_B"]);

        let key = DataKey::new(names.get_or_create_id("hist1"), names.get_or_create_id("B"));
        registry.insert(key, "hist1_@_B", Dataset::graph("hist1", vec![]));
        assert!(is_renderable(&plot, &registry));
        assert!(is_renderable(&plot, &registry));
    }
}
