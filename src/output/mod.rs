//! Rendering contract and output sinks.
//!
//! Drawing a plot is left to a [`Renderer`]. The shipped [`SummaryRenderer`] writes a JSON
//! description of the resolved plot together with statistics of every dataset it uses.
//! Finished [`Artifact`]s go either straight to a [`DirectorySink`] or, in archive mode,
//! stay in the ledger until the manager flushes them (see [`crate::ledger::archive`]).
//!
//! Output paths are `<output_dir>/<group>[/<category>]/<file>.<ext>`. File names are the
//! plot name, or the unique name if configured, with `/`, `:` and `.` replaced by `_`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::PlotError;
use crate::data::DatasetSummary;
use crate::plot::{Axis, DataEntry, Plot, PlotBox};
use crate::registry::DataRegistry;
use crate::utils::atomic_write;

/// Where finished plots go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// One file per plot, written immediately
    #[default]
    Directory,
    /// All plots in one zip archive, written at teardown
    Archive,
}

/// A produced plot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Unique name of the plot (`name_IN_group[:category]`)
    pub unique_name: String,
    /// Plain plot name
    pub name: String,
    /// Figure group
    pub figure_group: String,
    /// Figure category, may contain `/`
    pub figure_category: String,
    /// File extension without dot
    pub extension: String,
    /// Rendered bytes
    pub content: Vec<u8>,
}

/// Replace characters that cannot appear in a file name.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    name.replace(['/', ':', '.'], "_")
}

impl Artifact {
    /// File name of the artifact.
    #[must_use]
    pub fn file_name(&self, use_unique_name: bool) -> String {
        let base = if use_unique_name { &self.unique_name } else { &self.name };
        format!("{}.{}", sanitize_file_name(base), self.extension)
    }

    /// `group[/category]` relative directory of the artifact.
    #[must_use]
    pub fn relative_dir(&self) -> PathBuf {
        let mut dir = PathBuf::from(&self.figure_group);
        for segment in self.figure_category.split('/').filter(|s| !s.is_empty()) {
            dir.push(segment);
        }
        dir
    }

    /// Path of the artifact relative to the output root.
    #[must_use]
    pub fn relative_path(&self, use_unique_name: bool) -> PathBuf {
        self.relative_dir().join(self.file_name(use_unique_name))
    }
}

/// Turns a resolved plot into bytes.
pub trait Renderer {
    /// Extension of the produced files.
    fn extension(&self) -> &str;

    /// Render `plot`. Every dataset the plot references is present in `data`.
    fn render(&self, plot: &Plot, data: &DataRegistry) -> Result<Vec<u8>, PlotError>;
}

/// Renders a JSON summary of the plot and its datasets.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryRenderer;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlotSummary<'a> {
    unique_name: String,
    name: &'a str,
    figure_group: &'a str,
    figure_category: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    plot_style: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template: Option<&'a str>,
    pads: Vec<PadSummary<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PadSummary<'a> {
    id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    control_string: Option<&'a str>,
    data: Vec<EntrySummary<'a>>,
    boxes: &'a [PlotBox],
    axes: &'a BTreeMap<String, Axis>,
}

#[derive(Serialize)]
struct EntrySummary<'a> {
    entry: &'a DataEntry,
    datasets: Vec<DatasetSummary>,
}

impl Renderer for SummaryRenderer {
    fn extension(&self) -> &str {
        "json"
    }

    fn render(&self, plot: &Plot, data: &DataRegistry) -> Result<Vec<u8>, PlotError> {
        let mut pads = Vec::new();
        for (id, pad) in plot.pads() {
            let mut entries = Vec::new();
            for entry in &pad.data {
                let mut datasets = Vec::new();
                for reference in entry.references() {
                    let unique = reference.unique_name();
                    let dataset = data.get(&unique).ok_or_else(|| PlotError::Other {
                        message: format!("Dataset {unique} is not loaded"),
                    })?;
                    datasets.push(dataset.summary());
                }
                entries.push(EntrySummary {
                    entry,
                    datasets,
                });
            }
            pads.push(PadSummary {
                id: *id,
                control_string: pad.control_string.as_deref(),
                data: entries,
                boxes: &pad.boxes,
                axes: &pad.axes,
            });
        }

        let summary = PlotSummary {
            unique_name: plot.unique_name(),
            name: plot.name(),
            figure_group: plot.figure_group(),
            figure_category: plot.figure_category(),
            plot_style: plot.plot_style(),
            template: plot.template(),
            pads,
        };
        serde_json::to_vec_pretty(&summary).map_err(|e| PlotError::json(plot.unique_name(), &e))
    }
}

/// Receives finished artifacts.
pub trait OutputSink {
    /// Store `artifact` and return where it went.
    fn write(&mut self, artifact: &Artifact) -> Result<PathBuf>;
}

/// Writes every artifact into a directory tree.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
    use_unique_names: bool,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>, use_unique_names: bool) -> Self {
        Self {
            root: root.into(),
            use_unique_names,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl OutputSink for DirectorySink {
    fn write(&mut self, artifact: &Artifact) -> Result<PathBuf> {
        let path = self.root.join(artifact.relative_path(self.use_unique_names));
        atomic_write(&path, &artifact.content)
            .map_err(|e| PlotError::OutputError {
                path: path.display().to_string(),
                reason: format!("{e:#}"),
            })
            .with_context(|| format!("Cannot store plot {}", artifact.unique_name))?;
        tracing::debug!("Wrote {}", path.display());
        Ok(path)
    }
}
