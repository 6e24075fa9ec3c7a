//! Resolving the pending requests of one source across its candidate files.
//!
//! Files are processed strictly in the order they were registered. Each file only sees the
//! requests that earlier files left unresolved, and processing stops as soon as nothing is
//! pending. Problems with a single file (missing file, missing internal path, unreadable
//! table) are logged and the next file is tried.
//!
//! Inside a container file the pending requests are grouped by their directory part. For
//! every group the matching subdirectory is located below the file's entry point and the
//! extractor runs there, so each extraction pass works on requests that share one prefix.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::{PendingRequest, extract};
use crate::config::{Config, FileKind};
use crate::core::PlotError;
use crate::data::{Object, io::open_container_file};
use crate::registry::DataRegistry;
use crate::source::{FileRef, locator::locate, split_path};
use crate::tabular::read_delimited;
use crate::utils::expand_path;

/// Result of resolving one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOutcome {
    /// Source identifier that was resolved
    pub source_id: String,
    /// Number of datasets registered
    pub matched: usize,
    /// Requests found in none of the files
    pub unresolved: Vec<PendingRequest>,
    /// Every file reference that was searched
    pub files: Vec<String>,
}

impl ResolveOutcome {
    /// Whether every request was found.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// The unresolved requests as a [`PlotError::UnresolvedData`].
    #[must_use]
    pub fn to_error(&self) -> Option<PlotError> {
        if self.is_complete() {
            return None;
        }
        Some(PlotError::UnresolvedData {
            source_id: self.source_id.clone(),
            missing: self.unresolved.iter().map(|request| request.name.clone()).collect(),
            files: self.files.clone(),
        })
    }

    /// Multi-line report listing every missing dataset and every searched file.
    #[must_use]
    pub fn report(&self) -> String {
        let mut report = String::from("Not all required inputs could be found.\n Data:");
        for request in &self.unresolved {
            let _ = write!(report, "\n  - {} ({})", request.name, self.source_id);
        }
        report.push_str("\n not found in any of the following files:");
        for file in &self.files {
            let _ = write!(report, "\n  - {file}");
        }
        report
    }
}

/// Resolve `pending` against the candidate `files` of `source_id`.
///
/// Found datasets are moved into `registry`. Requests that remain unresolved after the last
/// file are reported in a single warning and returned in the outcome.
pub fn resolve_source(
    source_id: &str,
    files: &[String],
    pending: Vec<PendingRequest>,
    config: &Config,
    registry: &mut DataRegistry,
) -> ResolveOutcome {
    let mut pending = pending;
    let mut matched = 0;

    for reference in files {
        if pending.is_empty() {
            break;
        }
        let file = FileRef::parse(reference);
        let found = match config.file_kind(&file) {
            FileKind::Container => read_container(&file, &mut pending, registry),
            FileKind::Tabular => read_table(&file, config, &mut pending, registry),
            FileKind::Unsupported => {
                tracing::debug!("Skipping {}: unsupported file type", reference);
                0
            }
        };
        tracing::debug!("{} dataset(s) of source {} found in {}", found, source_id, reference);
        matched += found;
    }

    let outcome = ResolveOutcome {
        source_id: source_id.to_string(),
        matched,
        unresolved: pending,
        files: files.to_vec(),
    };
    if !outcome.is_complete() {
        tracing::warn!("{}", outcome.report());
    }
    outcome
}

fn read_container(file: &FileRef, pending: &mut Vec<PendingRequest>, registry: &mut DataRegistry) -> usize {
    let path = match expand_path(&file.path) {
        Ok(path) => path,
        Err(e) => {
            tracing::error!("{:#}", e);
            return 0;
        }
    };
    let mut root = match open_container_file(&path) {
        Ok(directory) => Object::Directory(directory),
        Err(e) => {
            tracing::error!("{:#}", e);
            return 0;
        }
    };
    let entry = match locate(&mut root, &file.sub_path) {
        Ok(entry) => entry,
        Err(e) => {
            tracing::error!("{}", e);
            return 0;
        }
    };

    let mut groups: BTreeMap<String, Vec<PendingRequest>> = BTreeMap::new();
    for request in pending.drain(..) {
        groups.entry(request.sub_spec().to_string()).or_default().push(request);
    }

    let mut matched = 0;
    for (sub_spec, mut group) in groups {
        match locate(&mut *entry, &split_path(&sub_spec)) {
            Ok(container) => matched += extract(container, &mut group, registry),
            Err(e) => tracing::debug!("{}: {}", file, e),
        }
        pending.append(&mut group);
    }
    matched
}

fn read_table(
    file: &FileRef,
    config: &Config,
    pending: &mut Vec<PendingRequest>,
    registry: &mut DataRegistry,
) -> usize {
    let base_name = file.base_name();
    let Some(position) = pending.iter().position(|request| request.name == base_name) else {
        return 0;
    };

    let dataset = expand_path(&file.path).map_err(|e| format!("{e:#}")).and_then(|path| {
        read_delimited(&path, &config.tabular.column_pattern, &config.tabular.delimiter)
            .map_err(|e| e.to_string())
    });
    match dataset {
        Ok(dataset) => {
            let request = pending.remove(position);
            registry.insert(request.key, &request.target, dataset);
            1
        }
        Err(reason) => {
            tracing::error!("Cannot read table {}: {}", file, reason);
            0
        }
    }
}
