//! Leaf datasets: binned histograms and point graphs.

use serde::{Deserialize, Serialize};

use super::ObjectClass;

/// Binned data with `contents.len() + 1` bin edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin edges in ascending order
    pub edges: Vec<f64>,
    /// Bin contents
    pub contents: Vec<f64>,
    /// Optional per-bin uncertainties (empty if not stored)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<f64>,
}

impl Histogram {
    /// Check that edges, contents and errors have consistent lengths.
    pub fn validate(&self) -> Result<(), String> {
        if self.edges.len() != self.contents.len() + 1 {
            return Err(format!(
                "{} bin edges do not fit {} bin contents",
                self.edges.len(),
                self.contents.len()
            ));
        }
        if !self.errors.is_empty() && self.errors.len() != self.contents.len() {
            return Err(format!(
                "{} errors do not fit {} bin contents",
                self.errors.len(),
                self.contents.len()
            ));
        }
        if self.edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err("bin edges are not strictly increasing".to_string());
        }
        Ok(())
    }
}

/// One point of a graph with symmetric uncertainties.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// x value
    pub x: f64,
    /// y value
    pub y: f64,
    /// uncertainty in x
    #[serde(default)]
    pub ex: f64,
    /// uncertainty in y
    #[serde(default)]
    pub ey: f64,
}

/// Ordered list of points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graph {
    /// The points in file order
    #[serde(default)]
    pub points: Vec<Point>,
}

/// Payload of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetKind {
    /// Binned data
    Histogram(Histogram),
    /// Point data
    Graph(Graph),
}

/// A named leaf object that can be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    kind: DatasetKind,
}

/// Compact description of a dataset used in generated summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    /// Unique name of the dataset
    pub name: String,
    /// `histogram` or `graph`
    pub class: ObjectClass,
    /// Number of bins or points
    pub entries: usize,
    /// Covered x range, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_range: Option<(f64, f64)>,
    /// Sum of bin contents (histograms) or of y values (graphs)
    pub sum: f64,
}

impl Dataset {
    /// Create a histogram dataset.
    pub fn histogram(name: impl Into<String>, histogram: Histogram) -> Self {
        Self {
            name: name.into(),
            kind: DatasetKind::Histogram(histogram),
        }
    }

    /// Create a graph dataset from its points.
    pub fn graph(name: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            kind: DatasetKind::Graph(Graph {
                points,
            }),
        }
    }

    /// Current name of the dataset.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the dataset.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Payload of the dataset.
    #[must_use]
    pub const fn kind(&self) -> &DatasetKind {
        &self.kind
    }

    /// Object class used in container files.
    #[must_use]
    pub const fn class(&self) -> ObjectClass {
        match self.kind {
            DatasetKind::Histogram(_) => ObjectClass::Histogram,
            DatasetKind::Graph(_) => ObjectClass::Graph,
        }
    }

    /// Number of bins or points.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.kind {
            DatasetKind::Histogram(h) => h.contents.len(),
            DatasetKind::Graph(g) => g.points.len(),
        }
    }

    /// Whether the dataset holds no bins or points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest and largest x covered by the dataset.
    #[must_use]
    pub fn x_range(&self) -> Option<(f64, f64)> {
        match &self.kind {
            DatasetKind::Histogram(h) => match (h.edges.first(), h.edges.last()) {
                (Some(low), Some(high)) if h.edges.len() > 1 => Some((*low, *high)),
                _ => None,
            },
            DatasetKind::Graph(g) => g.points.iter().fold(None, |range, p| match range {
                None => Some((p.x - p.ex, p.x + p.ex)),
                Some((low, high)) => Some((f64::min(low, p.x - p.ex), f64::max(high, p.x + p.ex))),
            }),
        }
    }

    /// Build the summary shown in generated artifacts.
    #[must_use]
    pub fn summary(&self) -> DatasetSummary {
        let sum = match &self.kind {
            DatasetKind::Histogram(h) => h.contents.iter().sum(),
            DatasetKind::Graph(g) => g.points.iter().map(|p| p.y).sum(),
        };
        DatasetSummary {
            name: self.name.clone(),
            class: self.class(),
            entries: self.len(),
            x_range: self.x_range(),
            sum,
        }
    }
}
