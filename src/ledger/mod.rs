//! Ledger of produced plots.
//!
//! Every artifact produced in a session is recorded under the plot's unique name. Producing
//! the same unique name again replaces the earlier artifact with a warning. The ledger also
//! keeps the order in which plots were produced, which a browsing front end can walk with a
//! [`HistoryCursor`].

pub mod archive;

use std::collections::HashMap;

use crate::output::Artifact;

/// Produced artifacts keyed by unique name, in production order.
#[derive(Debug, Default)]
pub struct Ledger {
    artifacts: HashMap<String, Artifact>,
    history: Vec<String>,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `artifact` under its unique name.
    ///
    /// An existing entry is replaced and returned; the name moves to the end of the history.
    pub fn put(&mut self, artifact: Artifact) -> Option<Artifact> {
        let unique_name = artifact.unique_name.clone();
        let previous = self.artifacts.insert(unique_name.clone(), artifact);
        if previous.is_some() {
            tracing::warn!("Plot {} was already created. Replacing it.", unique_name);
            self.history.retain(|name| *name != unique_name);
        }
        self.history.push(unique_name);
        previous
    }

    #[must_use]
    pub fn get(&self, unique_name: &str) -> Option<&Artifact> {
        self.artifacts.get(unique_name)
    }

    #[must_use]
    pub fn contains(&self, unique_name: &str) -> bool {
        self.artifacts.contains_key(unique_name)
    }

    /// Unique names in production order.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Artifacts in production order.
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.history.iter().filter_map(|name| self.artifacts.get(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn clear(&mut self) {
        self.artifacts.clear();
        self.history.clear();
    }

    /// Cursor positioned on the most recent artifact.
    #[must_use]
    pub fn cursor(&self) -> HistoryCursor<'_> {
        HistoryCursor {
            ledger: self,
            position: self.history.len().saturating_sub(1),
        }
    }
}

/// Position in the ledger history.
#[derive(Debug, Clone, Copy)]
pub struct HistoryCursor<'a> {
    ledger: &'a Ledger,
    position: usize,
}

impl<'a> HistoryCursor<'a> {
    /// Artifact under the cursor, `None` for an empty ledger.
    #[must_use]
    pub fn current(&self) -> Option<&'a Artifact> {
        self.ledger.history.get(self.position).and_then(|name| self.ledger.artifacts.get(name))
    }

    /// Index of the cursor in the history.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Move to the next artifact. Returns `false` at the end of the history.
    pub fn forward(&mut self) -> bool {
        if self.position + 1 < self.ledger.history.len() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous artifact. Returns `false` at the start of the history.
    pub fn back(&mut self) -> bool {
        if self.position > 0 {
            self.position -= 1;
            true
        } else {
            false
        }
    }
}
