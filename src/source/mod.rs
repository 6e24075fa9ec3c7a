//! Input sources: identifiers, their candidate files, and file references.
//!
//! A source identifier is a user-chosen label (e.g. `pp13TeV`) that names one logical data
//! source. It maps to an ordered list of file references that are searched in order when
//! datasets of that source are requested. A file reference has the form
//! `path[:internal/sub/path]`; the optional part after the colon selects a nested container
//! inside the file as the entry point.
//!
//! - [`InputFiles`]: identifier → file references, persisted as TOML (see [`io`])
//! - [`FileRef`]: parsed file reference
//! - [`locator`]: walks from a file's root to the container named by the sub-path

pub mod io;
pub mod locator;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::constants::{DATA_SEPARATOR, GROUP_SEPARATOR, PATH_SEPARATOR};
use crate::core::PlotError;

/// Parsed `path[:internalSubPath]` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    /// Path of the file on disk
    pub path: String,
    /// Segments of the internal path, empty for the file's root
    pub sub_path: Vec<String>,
}

impl FileRef {
    /// Split a reference at the first `:` into file path and internal path.
    #[must_use]
    pub fn parse(reference: &str) -> Self {
        match reference.split_once(':') {
            Some((path, sub_path)) => Self {
                path: path.to_string(),
                sub_path: split_path(sub_path),
            },
            None => Self {
                path: reference.to_string(),
                sub_path: Vec::new(),
            },
        }
    }

    /// Lower-cased extension of the file path.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.path).extension().map(|ext| ext.to_string_lossy().to_lowercase())
    }

    /// File name without directory and extension.
    #[must_use]
    pub fn base_name(&self) -> String {
        Path::new(&self.path)
            .file_stem()
            .map_or_else(|| self.path.clone(), |stem| stem.to_string_lossy().into_owned())
    }

    /// The internal path joined with `/`.
    #[must_use]
    pub fn sub_path_string(&self) -> String {
        self.sub_path.join("/")
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sub_path.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}:{}", self.path, self.sub_path_string())
        }
    }
}

/// Split a `/`-separated path into its non-empty segments.
#[must_use]
pub fn split_path(path: &str) -> Vec<String> {
    path.split(PATH_SEPARATOR).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

/// Reject names that contain one of the unique-name separators.
pub fn validate_name(name: &str) -> Result<(), PlotError> {
    for separator in [DATA_SEPARATOR, GROUP_SEPARATOR] {
        if name.contains(separator) {
            return Err(PlotError::InvalidName {
                name: name.to_string(),
                separator: separator.to_string(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct SourceEntry {
    #[serde(default)]
    files: Vec<String>,
}

/// Registry of source identifiers and their candidate files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputFiles {
    sources: BTreeMap<String, SourceEntry>,
}

impl InputFiles {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the ordered candidate files of `identifier`.
    ///
    /// An existing identifier is replaced with a warning.
    pub fn add_files(&mut self, identifier: &str, files: Vec<String>) -> Result<(), PlotError> {
        validate_name(identifier)?;
        if self.sources.contains_key(identifier) {
            tracing::warn!("Replacing input identifier {}.", identifier);
        }
        self.sources.insert(
            identifier.to_string(),
            SourceEntry {
                files,
            },
        );
        Ok(())
    }

    /// Register a single candidate file for `identifier`.
    pub fn add_file(&mut self, identifier: &str, file: impl Into<String>) -> Result<(), PlotError> {
        self.add_files(identifier, vec![file.into()])
    }

    /// Candidate files of `identifier` in search order.
    #[must_use]
    pub fn files(&self, identifier: &str) -> Option<&[String]> {
        self.sources.get(identifier).map(|entry| entry.files.as_slice())
    }

    /// Iterate over identifiers and their files.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.sources.iter().map(|(id, entry)| (id.as_str(), entry.files.as_slice()))
    }

    /// Number of identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether no identifier is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Copy every identifier of `other` into this registry.
    pub fn extend(&mut self, other: Self) -> Result<(), PlotError> {
        for (identifier, entry) in other.sources {
            self.add_files(&identifier, entry.files)?;
        }
        Ok(())
    }
}
