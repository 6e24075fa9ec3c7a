//! Bidirectional name ↔ id registry.
//!
//! Dataset names and input identifiers are interned to small integer ids so the
//! requirement bookkeeping can work with cheap `Copy` keys. The registry is append-only:
//! ids are handed out in order of first sight and stay valid for the registry's lifetime.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::core::PlotError;

/// Interned id of a dataset name or input identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NameId(usize);

impl NameId {
    /// Position of the name in registration order.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Append-only interner with O(1) lookup in both directions.
#[derive(Debug, Default, Clone)]
pub struct NameRegistry {
    ids: HashMap<String, NameId>,
    names: Vec<String>,
}

impl NameRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of `name`, allocating the next free id on first sight.
    pub fn get_or_create_id(&mut self, name: &str) -> NameId {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = NameId(self.names.len());
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Look up the id of an already registered name.
    #[must_use]
    pub fn id(&self, name: &str) -> Option<NameId> {
        self.ids.get(name).copied()
    }

    /// Recover the string behind `id`.
    ///
    /// Returns `None` for ids this registry never handed out.
    #[must_use]
    pub fn name(&self, id: NameId) -> Option<&str> {
        self.names.get(id.0).map(String::as_str)
    }

    /// Like [`NameRegistry::name`] but turns an unknown id into [`PlotError::UnknownNameId`].
    pub fn name_or_err(&self, id: NameId) -> Result<&str, PlotError> {
        self.name(id).ok_or(PlotError::UnknownNameId {
            id: id.0,
        })
    }

    /// Number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no name was registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_stable() {
        let mut registry = NameRegistry::new();
        let a = registry.get_or_create_id("hist1");
        let b = registry.get_or_create_id("A");
        assert_eq!(registry.get_or_create_id("hist1"), a);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut registry = NameRegistry::new();
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            assert_eq!(registry.get_or_create_id(name).get(), i);
        }
    }

    #[test]
    fn test_reverse_lookup() {
        let mut registry = NameRegistry::new();
        let id = registry.get_or_create_id("sub/hist2");
        assert_eq!(registry.name(id), Some("sub/hist2"));
        assert_eq!(registry.id("sub/hist2"), Some(id));
        assert_eq!(registry.id("unknown"), None);
    }

    #[test]
    fn test_ids_index_every_registered_name() {
        let mut registry = NameRegistry::new();
        let names: Vec<String> = (0..70_000).map(|i| format!("hist{i}")).collect();
        for name in &names {
            registry.get_or_create_id(name);
        }
        let last = registry.get_or_create_id("last");
        assert_eq!(last.get(), names.len());
        assert_eq!(registry.name(last), Some("last"));
        assert_eq!(registry.name_or_err(registry.id("hist65536").unwrap()).unwrap(), "hist65536");
    }

    #[test]
    fn test_unknown_id() {
        let mut other = NameRegistry::new();
        other.get_or_create_id("x");
        other.get_or_create_id("y");
        let foreign = other.get_or_create_id("z");

        let registry = NameRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.name(foreign), None);
        assert!(matches!(
            registry.name_or_err(foreign),
            Err(PlotError::UnknownNameId {
                id: 2
            })
        ));
    }
}
