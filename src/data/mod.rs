//! In-memory model of hierarchical input files.
//!
//! Input files are trees of [`Object`]s: directories (with lazily read keys), flat object
//! lists, and leaf [`Dataset`]s. The locator walks these trees to find the entry point of a
//! file reference and the extractor moves matching datasets out of them.
//!
//! # File Format
//!
//! Container files are JSON directory documents:
//!
//! ```json
//! { "keys": [
//!     { "name": "hist1", "class": "histogram",
//!       "object": { "edges": [0, 1, 2], "contents": [5, 7] } },
//!     { "name": "sub", "class": "directory",
//!       "object": { "keys": [] } },
//!     { "name": "list", "class": "list",
//!       "object": { "items": [ { "name": "g", "class": "graph",
//!                                "object": { "points": [ { "x": 1, "y": 2 } ] } } ] } }
//! ] }
//! ```

mod container;
mod dataset;
pub mod io;

pub use container::{Container, Directory, Key, ObjectList};
pub use dataset::{Dataset, DatasetKind, DatasetSummary, Graph, Histogram, Point};

use serde::{Deserialize, Serialize};

/// Class tag of an object stored in a container file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectClass {
    /// Keyed directory
    Directory,
    /// Flat object list
    List,
    /// Binned dataset
    Histogram,
    /// Point dataset
    Graph,
}

impl ObjectClass {
    /// Whether objects of this class hold named children.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        matches!(self, Self::Directory | Self::List)
    }
}

/// Node of an input file tree.
#[derive(Debug, Clone)]
pub enum Object {
    /// Directory with lazy keys
    Directory(Directory),
    /// Flat list of objects
    List(ObjectList),
    /// Leaf dataset
    Data(Dataset),
}

impl Object {
    /// Name of the node.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Directory(dir) => dir.name(),
            Self::List(list) => list.name(),
            Self::Data(dataset) => dataset.name(),
        }
    }

    /// Class tag of the node.
    #[must_use]
    pub const fn class(&self) -> ObjectClass {
        match self {
            Self::Directory(_) => ObjectClass::Directory,
            Self::List(_) => ObjectClass::List,
            Self::Data(dataset) => dataset.class(),
        }
    }

    /// Whether the node holds named children.
    #[must_use]
    pub const fn is_traversable(&self) -> bool {
        self.class().is_traversable()
    }

    /// View the node as a container, if it is one.
    pub fn as_container_mut(&mut self) -> Option<&mut dyn Container> {
        match self {
            Self::Directory(dir) => Some(dir),
            Self::List(list) => Some(list),
            Self::Data(_) => None,
        }
    }

    /// Take the dataset out of a leaf node.
    #[must_use]
    pub fn into_dataset(self) -> Option<Dataset> {
        match self {
            Self::Data(dataset) => Some(dataset),
            Self::Directory(_) | Self::List(_) => None,
        }
    }
}

impl From<Dataset> for Object {
    fn from(dataset: Dataset) -> Self {
        Self::Data(dataset)
    }
}

impl From<Directory> for Object {
    fn from(dir: Directory) -> Self {
        Self::Directory(dir)
    }
}

impl From<ObjectList> for Object {
    fn from(list: ObjectList) -> Self {
        Self::List(list)
    }
}
