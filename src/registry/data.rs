//! Registry of extracted datasets.
//!
//! Every dataset that the extractor or the tabular reader hands over ends up here under its
//! unique name (`name_@_source`). Next to the datasets the registry keeps an index of which
//! `(source, name)` id pairs were loaded, which the requirement aggregator consults to skip
//! data that does not need to be read again.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::names::NameId;
use crate::data::Dataset;

/// Interned `(dataset name, source identifier)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataKey {
    /// Id of the dataset name (may contain `/`-separated path segments)
    pub name: NameId,
    /// Id of the input identifier
    pub source: NameId,
}

impl DataKey {
    /// Create a key from its two ids.
    #[must_use]
    pub const fn new(name: NameId, source: NameId) -> Self {
        Self {
            name,
            source,
        }
    }
}

/// Owner of all extracted datasets, keyed by unique name.
#[derive(Debug, Default)]
pub struct DataRegistry {
    datasets: BTreeMap<String, Dataset>,
    loaded: HashMap<NameId, HashSet<NameId>>,
}

impl DataRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `dataset` and register it as `unique_name`.
    ///
    /// The dataset is renamed to its unique name. If an entry with the same unique name
    /// existed it is returned.
    pub fn insert(&mut self, key: DataKey, unique_name: &str, mut dataset: Dataset) -> Option<Dataset> {
        dataset.set_name(unique_name);
        self.loaded.entry(key.source).or_default().insert(key.name);
        let previous = self.datasets.insert(unique_name.to_string(), dataset);
        if previous.is_some() {
            tracing::debug!("Replaced dataset {} in registry", unique_name);
        }
        previous
    }

    /// Whether the dataset behind `key` was registered.
    #[must_use]
    pub fn is_loaded(&self, key: DataKey) -> bool {
        self.loaded.get(&key.source).is_some_and(|names| names.contains(&key.name))
    }

    /// Whether a dataset with this unique name exists.
    #[must_use]
    pub fn contains(&self, unique_name: &str) -> bool {
        self.datasets.contains_key(unique_name)
    }

    /// Borrow a dataset by unique name.
    #[must_use]
    pub fn get(&self, unique_name: &str) -> Option<&Dataset> {
        self.datasets.get(unique_name)
    }

    /// Iterate over all datasets ordered by unique name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Dataset)> {
        self.datasets.iter().map(|(name, dataset)| (name.as_str(), dataset))
    }

    /// Number of registered datasets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Whether the registry holds no datasets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Drop every dataset and forget what was loaded.
    pub fn clear(&mut self) {
        self.datasets.clear();
        self.loaded.clear();
    }
}
