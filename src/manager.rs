//! The plot manager: one explicitly owned context for a plotting session.
//!
//! A [`PlotManager`] owns every long-lived piece of state of a session: the name and dataset
//! registries, the input-file registry, the defined plots and templates, cached plot files
//! and the ledger of produced artifacts. Its lifecycle is
//!
//! 1. [`PlotManager::new`] with a [`Config`],
//! 2. registering inputs ([`add_input_files`](PlotManager::add_input_files),
//!    [`load_input_files`](PlotManager::load_input_files)) and plots
//!    ([`add_plot`](PlotManager::add_plot), [`read_plot_file`](PlotManager::read_plot_file)),
//! 3. any number of [`create_plots`](PlotManager::create_plots) batches,
//! 4. [`finish`](PlotManager::finish), which flushes an archive if the output mode asks
//!    for one and clears the session. Dropping the manager calls it as well.
//!
//! A batch resolves the datasets of all selected plots at once: requirements are collected
//! per input identifier, every identifier's files are searched once, and only then is each
//! plot checked and generated. A plot whose data could not be found is reported and skipped
//! while the rest of the batch continues.

use anyhow::{Context, Result};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::constants::{DATA_SEPARATOR, TEMPLATE_GROUP};
use crate::core::PlotError;
use crate::extractor::{PendingRequest, resolve_source};
use crate::ledger::{Ledger, archive::write_archive};
use crate::output::{Artifact, DirectorySink, OutputMode, OutputSink, Renderer};
use crate::plot::io::{PlotFile, write_plot_file};
use crate::plot::{Plot, PlotSelector, merge::merge, unique_plot_name};
use crate::registry::{DataKey, DataRegistry, NameRegistry};
use crate::requirements::{RequiredData, compute_required, is_renderable, missing_data};
use crate::source::{InputFiles, validate_name};

/// Maximum edit distance, in percent of the requested name, for "did you mean" hints.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// What [`PlotManager::read_plot_file`] does with matching plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Only report matching plots
    Find,
    /// Add matching plots to the manager
    Load,
}

/// Outcome of one [`PlotManager::create_plots`] batch.
#[derive(Debug, Clone, Default)]
pub struct CreateReport {
    /// Unique names of the plots that were produced
    pub created: Vec<String>,
    /// Unique names of selected plots that could not be produced
    pub failed: Vec<String>,
    /// Requested plot names that are not defined at all
    pub not_found: Vec<String>,
    /// One [`PlotError::UnresolvedData`] per input identifier with datasets that were not found
    pub unresolved: Vec<PlotError>,
}

impl CreateReport {
    /// Whether every selected plot was produced and nothing requested was missing.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.not_found.is_empty()
    }
}

/// Session context owning registries, plots and the ledger.
#[derive(Debug)]
pub struct PlotManager {
    config: Config,
    names: NameRegistry,
    data: DataRegistry,
    inputs: InputFiles,
    plots: Vec<Plot>,
    templates: Vec<Plot>,
    plot_files: HashMap<PathBuf, PlotFile>,
    ledger: Ledger,
}

impl PlotManager {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            names: NameRegistry::new(),
            data: DataRegistry::new(),
            inputs: InputFiles::new(),
            plots: Vec::new(),
            templates: Vec::new(),
            plot_files: HashMap::new(),
            ledger: Ledger::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn names(&self) -> &NameRegistry {
        &self.names
    }

    #[must_use]
    pub const fn data(&self) -> &DataRegistry {
        &self.data
    }

    #[must_use]
    pub const fn input_files(&self) -> &InputFiles {
        &self.inputs
    }

    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Defined plots in insertion order.
    #[must_use]
    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    #[must_use]
    pub fn templates(&self) -> &[Plot] {
        &self.templates
    }

    #[must_use]
    pub fn template(&self, name: &str) -> Option<&Plot> {
        self.templates.iter().find(|t| t.name() == name)
    }

    /// Register the candidate files of an input identifier, replacing earlier ones.
    pub fn add_input_files(&mut self, identifier: &str, files: Vec<String>) -> Result<(), PlotError> {
        self.inputs.add_files(identifier, files)
    }

    /// Merge an input-file registry from disk into the current one.
    ///
    /// On error the current registry is left untouched.
    pub fn load_input_files(&mut self, path: &Path) -> Result<()> {
        let loaded = InputFiles::load(path)?;
        self.inputs.extend(loaded)?;
        Ok(())
    }

    /// Write the input-file registry to disk.
    pub fn dump_input_files(&self, path: &Path) -> Result<()> {
        self.inputs.save(path)
    }

    fn validate_plot(plot: &Plot) -> Result<(), PlotError> {
        if plot.figure_group().is_empty() {
            return Err(PlotError::MissingFigureGroup {
                plot: plot.name().to_string(),
            });
        }
        validate_name(plot.name())?;
        validate_name(plot.figure_group())?;
        for reference in plot.data_refs() {
            validate_name(reference.name)?;
            validate_name(reference.input)?;
        }
        Ok(())
    }

    /// Add a plot, replacing one with the same unique name.
    ///
    /// # Errors
    ///
    /// Rejects plots in the reserved template group, plots without a figure group and names
    /// that contain a unique-name separator.
    pub fn add_plot(&mut self, plot: Plot) -> Result<(), PlotError> {
        if plot.figure_group() == TEMPLATE_GROUP {
            return Err(PlotError::ReservedGroupName {
                plot: plot.name().to_string(),
            });
        }
        Self::validate_plot(&plot)?;

        let unique_name = plot.unique_name();
        match self.plots.iter_mut().find(|p| p.unique_name() == unique_name) {
            Some(existing) => {
                tracing::debug!("Replacing plot {}", unique_name);
                *existing = plot;
            }
            None => self.plots.push(plot),
        }
        Ok(())
    }

    /// Add a template, replacing one with the same name. The figure group is forced to the
    /// template group.
    pub fn add_template(&mut self, mut template: Plot) -> Result<(), PlotError> {
        template.set_figure_group(TEMPLATE_GROUP);
        Self::validate_plot(&template)?;

        match self.templates.iter_mut().find(|t| t.name() == template.name()) {
            Some(existing) => {
                tracing::debug!("Replacing template {}", template.name());
                *existing = template;
            }
            None => self.templates.push(template),
        }
        Ok(())
    }

    /// Write the selected plots, preceded by the templates they use, into a plot file.
    ///
    /// Returns the number of written tables.
    pub fn dump_plots(&self, path: &Path, selector: &PlotSelector) -> Result<usize> {
        let selected: Vec<&Plot> = self.plots.iter().filter(|p| selector.matches_plot(p)).collect();
        let used: BTreeSet<&str> = selected.iter().filter_map(|p| p.template()).collect();
        let templates = self.templates.iter().filter(|t| used.contains(t.name()));

        let written = write_plot_file(path, templates.chain(selected.iter().copied()))?;
        tracing::info!("Wrote {} plot definition(s) to {}", written, path.display());
        Ok(written)
    }

    /// Find or load the plots of a plot file that `selector` accepts.
    ///
    /// Templates are always loaded in [`ReadMode::Load`]. Malformed plot tables are logged
    /// and skipped. Parsed files are cached for the lifetime of the manager. Returns the
    /// unique names of the matching plots.
    pub fn read_plot_file(&mut self, path: &Path, selector: &PlotSelector, mode: ReadMode) -> Result<Vec<String>> {
        let file = match self.plot_files.remove(path) {
            Some(file) => file,
            None => PlotFile::load(path)?,
        };

        let mut found = Vec::new();
        for entry in file.entries() {
            if entry.group == TEMPLATE_GROUP {
                if mode == ReadMode::Load {
                    if let Err(e) = entry.to_plot().and_then(|template| self.add_template(template)) {
                        tracing::error!("Skipping template {}: {}", entry.key, e);
                    }
                }
                continue;
            }

            let (name, group, category) = match entry.header() {
                Ok(header) => header,
                Err(e) => {
                    tracing::error!("Skipping plot {}: {}", entry.key, e);
                    continue;
                }
            };
            if !selector.matches(&group, &category, &name) {
                continue;
            }

            let unique_name = unique_plot_name(&name, &group, &category);
            match mode {
                ReadMode::Find => {
                    tracing::debug!("Found plot {}", unique_name);
                    found.push(unique_name);
                }
                ReadMode::Load => match entry.to_plot().and_then(|plot| self.add_plot(plot)) {
                    Ok(()) => found.push(unique_name),
                    Err(e) => tracing::error!("Skipping plot {}: {}", entry.key, e),
                },
            }
        }

        self.plot_files.insert(path.to_path_buf(), file);
        Ok(found)
    }

    /// Drop every loaded dataset. Names stay registered.
    pub fn clear_data(&mut self) {
        self.data.clear();
    }

    fn pending_requests(&self, required: &RequiredData) -> Result<Vec<(String, Vec<PendingRequest>)>, PlotError> {
        let mut batches = Vec::new();
        for (source_id, name_ids) in required {
            let source = self.names.name_or_err(*source_id)?;
            let mut pending = Vec::new();
            for name_id in name_ids {
                let name = self.names.name_or_err(*name_id)?;
                pending.push(PendingRequest {
                    name: name.to_string(),
                    target: format!("{name}{DATA_SEPARATOR}{source}"),
                    key: DataKey::new(*name_id, *source_id),
                });
            }
            batches.push((source.to_string(), pending));
        }
        Ok(batches)
    }

    /// Read the required datasets. Returns what stayed unresolved, per input identifier.
    fn load_required(&mut self, required: &RequiredData) -> Result<Vec<PlotError>, PlotError> {
        let mut unresolved = Vec::new();
        for (source, pending) in self.pending_requests(required)? {
            let Some(files) = self.inputs.files(&source) else {
                let missing: Vec<String> = pending.into_iter().map(|r| r.name).collect();
                tracing::warn!(
                    "No input files registered for identifier {}. Cannot load: {}",
                    source,
                    missing.join(", ")
                );
                unresolved.push(PlotError::UnresolvedData {
                    source_id: source,
                    missing,
                    files: Vec::new(),
                });
                continue;
            };
            let outcome = resolve_source(&source, files, pending, &self.config, &mut self.data);
            tracing::debug!("Loaded {} dataset(s) of {}", outcome.matched, source);
            unresolved.extend(outcome.to_error());
        }
        Ok(unresolved)
    }

    /// The plot with its template applied.
    fn resolve_plot(&self, plot: &Plot) -> Plot {
        let Some(name) = plot.template() else {
            return plot.clone();
        };
        match self.template(name) {
            Some(template) => merge(template, plot),
            None => {
                tracing::warn!("Template {} of plot {} is not defined", name, plot.unique_name());
                plot.clone()
            }
        }
    }

    fn suggestions(&self, requested: &str) -> Vec<&str> {
        let mut scored: Vec<(&str, usize)> = self
            .plots
            .iter()
            .map(|p| (p.name(), strsim::levenshtein(requested, p.name())))
            .collect();
        scored.sort_by_key(|(name, distance)| (*distance, *name));
        scored.dedup();
        scored
            .into_iter()
            .filter(|(_, distance)| *distance <= requested.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .take(3)
            .map(|(name, _)| name)
            .collect()
    }

    fn not_found(&self, selector: &PlotSelector) -> Vec<String> {
        let mut missing = Vec::new();
        for requested in selector.literal_names() {
            if self.plots.iter().any(|p| p.name() == requested && selector.matches_plot(p)) {
                continue;
            }
            let elsewhere: Vec<String> =
                self.plots.iter().filter(|p| p.name() == requested).map(Plot::unique_name).collect();
            let suggestions = self.suggestions(&requested);
            if !elsewhere.is_empty() {
                tracing::warn!(
                    "Plot {} is not defined in the selected groups. Defined as: {}",
                    requested,
                    elsewhere.join(", ")
                );
            } else if suggestions.is_empty() {
                tracing::warn!("Plot {} is not defined", requested);
            } else {
                tracing::warn!("Plot {} is not defined. Did you mean: {}?", requested, suggestions.join(", "));
            }
            missing.push(requested);
        }
        missing
    }

    /// Produce every selected plot.
    ///
    /// Datasets of all selected plots are loaded in one pass first. Plots with missing data
    /// or a failing renderer are logged and listed in [`CreateReport::failed`].
    ///
    /// # Errors
    ///
    /// Only failures to write into the output directory abort the batch.
    pub fn create_plots(&mut self, selector: &PlotSelector, renderer: &dyn Renderer) -> Result<CreateReport> {
        let mut report = CreateReport {
            not_found: self.not_found(selector),
            ..CreateReport::default()
        };

        // requirements include data inherited from templates
        let selected: Vec<Plot> =
            self.plots.iter().filter(|p| selector.matches_plot(p)).map(|p| self.resolve_plot(p)).collect();
        if selected.is_empty() {
            tracing::warn!("No plots selected");
            return Ok(report);
        }

        let required = compute_required(&selected, &mut self.names, &self.data);
        report.unresolved = self.load_required(&required)?;

        let mut sink = match self.config.output_mode {
            OutputMode::Directory => {
                Some(DirectorySink::new(self.config.output_path()?, self.config.use_unique_plot_names))
            }
            OutputMode::Archive => None,
        };

        for plot in &selected {
            let unique_name = plot.unique_name();
            if !is_renderable(plot, &self.data) {
                tracing::error!(
                    "Plot {} cannot be created. Missing data: {}",
                    unique_name,
                    missing_data(plot, &self.data).join(", ")
                );
                report.failed.push(unique_name);
                continue;
            }

            let content = match renderer.render(plot, &self.data) {
                Ok(content) => content,
                Err(e) => {
                    tracing::error!("Plot {} cannot be created: {}", unique_name, e);
                    report.failed.push(unique_name);
                    continue;
                }
            };
            let artifact = Artifact {
                unique_name: unique_name.clone(),
                name: plot.name().to_string(),
                figure_group: plot.figure_group().to_string(),
                figure_category: plot.figure_category().to_string(),
                extension: renderer.extension().to_string(),
                content,
            };

            if let Some(sink) = sink.as_mut() {
                sink.write(&artifact)?;
            }
            self.ledger.put(artifact);
            tracing::info!("Created plot {}", unique_name);
            report.created.push(unique_name);
        }
        Ok(report)
    }

    /// Produce the plot `name` of `group` (`group[:category]`).
    pub fn create_plot(&mut self, name: &str, group: &str, renderer: &dyn Renderer) -> Result<CreateReport> {
        let selector = PlotSelector::exact(name, group)?;
        self.create_plots(&selector, renderer)
    }

    /// Flush archived artifacts and clear the session.
    ///
    /// Returns the archive path if one was written.
    pub fn finish(&mut self) -> Result<Option<PathBuf>> {
        let mut archive = None;
        if self.config.output_mode == OutputMode::Archive && !self.ledger.is_empty() {
            let path = self.config.output_path()?.join(&self.config.archive_file_name);
            let stored = write_archive(&path, self.ledger.iter(), self.config.use_unique_plot_names)
                .map_err(|e| PlotError::OutputError {
                    path: path.display().to_string(),
                    reason: format!("{e:#}"),
                })
                .context("Cannot write plot archive")?;
            tracing::info!("Stored {} plot(s) in {}", stored, path.display());
            archive = Some(path);
        }
        self.ledger.clear();
        self.data.clear();
        Ok(archive)
    }
}

impl Drop for PlotManager {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            tracing::error!("{:#}", e);
        }
    }
}
