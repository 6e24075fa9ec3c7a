//! TOML plot definition files.
//!
//! Plots are stored below their figure group, keyed by a display form of their unique name
//! (`.` becomes `_`, `/` becomes `|`):
//!
//! ```toml
//! ["GROUP::spectra"."PLOT::pt_IN_spectra:pp"]
//! name = "pt"
//! figureGroup = "spectra"
//! figureCategory = "pp"
//! template = "T1"
//!
//! ["GROUP::spectra"."PLOT::pt_IN_spectra:pp".PAD_1]
//! controlString = "logY"
//!
//! ["GROUP::spectra"."PLOT::pt_IN_spectra:pp".PAD_1.DATA_1]
//! type = "data"
//! name = "hist1"
//! inputIdentifier = "A"
//!
//! ["GROUP::spectra"."PLOT::pt_IN_spectra:pp".PAD_1.AXIS_X]
//! title = "pT"
//! ```
//!
//! Data entries are tagged `data` or `ratio`, boxes `legend` or `text`. Entries are
//! ordered by their numeric suffix.

use anyhow::{Context, Result};
use std::path::Path;
use toml::{Table, Value};

use super::{Axis, DataEntry, Pad, Plot, PlotBox};
use crate::core::PlotError;
use crate::utils::atomic_write;

const GROUP_PREFIX: &str = "GROUP::";
const PLOT_PREFIX: &str = "PLOT::";
const PAD_PREFIX: &str = "PAD_";
const DATA_PREFIX: &str = "DATA_";
const BOX_PREFIX: &str = "BOX_";
const AXIS_PREFIX: &str = "AXIS_";

/// Key of a plot inside its group table.
#[must_use]
pub fn display_name(plot: &Plot) -> String {
    plot.unique_name().replace('.', "_").replace('/', "|")
}

fn invalid(key: &str, reason: impl Into<String>) -> PlotError {
    PlotError::PlotDefinitionInvalid {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn to_value<T: serde::Serialize>(key: &str, value: &T) -> Result<Value, PlotError> {
    Value::try_from(value).map_err(|e| invalid(key, e.to_string()))
}

/// Convert a plot into its table.
pub fn plot_to_table(plot: &Plot) -> Result<Table, PlotError> {
    let key = display_name(plot);
    let mut table = Table::new();
    table.insert("name".into(), plot.name().into());
    table.insert("figureGroup".into(), plot.figure_group().into());
    table.insert("figureCategory".into(), plot.figure_category().into());
    if let Some(style) = plot.plot_style() {
        table.insert("plotStyle".into(), style.into());
    }
    if let Some(template) = plot.template() {
        table.insert("template".into(), template.into());
    }

    for (id, pad) in plot.pads() {
        let mut pad_table = Table::new();
        if let Some(control) = &pad.control_string {
            pad_table.insert("controlString".into(), control.as_str().into());
        }
        for (index, entry) in pad.data.iter().enumerate() {
            pad_table.insert(format!("{DATA_PREFIX}{}", index + 1), to_value(&key, entry)?);
        }
        for (index, plot_box) in pad.boxes.iter().enumerate() {
            pad_table.insert(format!("{BOX_PREFIX}{}", index + 1), to_value(&key, plot_box)?);
        }
        for (name, axis) in &pad.axes {
            pad_table.insert(format!("{AXIS_PREFIX}{name}"), to_value(&key, axis)?);
        }
        table.insert(format!("{PAD_PREFIX}{id}"), Value::Table(pad_table));
    }
    Ok(table)
}

fn string_field(key: &str, table: &Table, field: &str) -> Result<String, PlotError> {
    match table.get(field) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(invalid(key, format!("'{field}' must be a string"))),
        None => Err(invalid(key, format!("missing '{field}'"))),
    }
}

fn optional_string(key: &str, table: &Table, field: &str) -> Result<Option<String>, PlotError> {
    match table.get(field) {
        None => Ok(None),
        Some(_) => string_field(key, table, field).map(Some),
    }
}

fn suffix_index(key: &str, entry: &str, suffix: &str) -> Result<u32, PlotError> {
    suffix.parse().map_err(|_| invalid(key, format!("'{entry}' has no numeric index")))
}

fn pad_from_table(key: &str, table: &Table) -> Result<Pad, PlotError> {
    let mut pad = Pad {
        control_string: optional_string(key, table, "controlString")?,
        ..Pad::default()
    };
    let mut data = Vec::new();
    let mut boxes = Vec::new();

    for (entry, value) in table {
        let convert = |e: toml::de::Error| invalid(key, format!("{entry}: {e}"));
        if let Some(suffix) = entry.strip_prefix(DATA_PREFIX) {
            let item: DataEntry = value.clone().try_into().map_err(convert)?;
            data.push((suffix_index(key, entry, suffix)?, item));
        } else if let Some(suffix) = entry.strip_prefix(BOX_PREFIX) {
            let item: PlotBox = value.clone().try_into().map_err(convert)?;
            boxes.push((suffix_index(key, entry, suffix)?, item));
        } else if let Some(axis) = entry.strip_prefix(AXIS_PREFIX) {
            let item: Axis = value.clone().try_into().map_err(convert)?;
            pad.axes.insert(axis.to_string(), item);
        }
    }

    data.sort_by_key(|(index, _)| *index);
    boxes.sort_by_key(|(index, _)| *index);
    pad.data = data.into_iter().map(|(_, item)| item).collect();
    pad.boxes = boxes.into_iter().map(|(_, item)| item).collect();
    Ok(pad)
}

/// Build a plot from its table. `key` names the table in error messages.
pub fn plot_from_table(key: &str, table: &Table) -> Result<Plot, PlotError> {
    let name = string_field(key, table, "name")?;
    let group = string_field(key, table, "figureGroup")?;
    let category = optional_string(key, table, "figureCategory")?.unwrap_or_default();

    let mut plot = Plot::new(name, &group);
    plot.set_figure_category(category);
    if let Some(style) = optional_string(key, table, "plotStyle")? {
        plot.set_plot_style(style);
    }
    if let Some(template) = optional_string(key, table, "template")? {
        plot.set_template(template);
    }

    for (entry, value) in table {
        let Some(suffix) = entry.strip_prefix(PAD_PREFIX) else {
            continue;
        };
        let id = suffix_index(key, entry, suffix)?;
        let Value::Table(pad_table) = value else {
            return Err(invalid(key, format!("'{entry}' must be a table")));
        };
        plot.pads_mut().insert(id, pad_from_table(key, pad_table)?);
    }
    Ok(plot)
}

/// One plot table of a plot file, not yet converted.
#[derive(Debug, Clone, Copy)]
pub struct PlotEntry<'a> {
    /// Figure group from the group key
    pub group: &'a str,
    /// Full `GROUP::...`/`PLOT::...` key, for messages
    pub key: &'a str,
    table: &'a Table,
}

impl PlotEntry<'_> {
    /// Plot name, figure group and category without converting the whole plot.
    pub fn header(&self) -> Result<(String, String, String), PlotError> {
        Ok((
            string_field(self.key, self.table, "name")?,
            string_field(self.key, self.table, "figureGroup")?,
            optional_string(self.key, self.table, "figureCategory")?.unwrap_or_default(),
        ))
    }

    /// Convert the table into a plot.
    pub fn to_plot(&self) -> Result<Plot, PlotError> {
        plot_from_table(self.key, self.table)
    }
}

/// Parsed plot definition file.
#[derive(Debug, Clone, Default)]
pub struct PlotFile {
    entries: Vec<(String, String, Table)>,
}

impl PlotFile {
    /// Parse a plot file. Group or plot tables with unexpected keys are skipped with a warning.
    pub fn parse(content: &str) -> Result<Self, PlotError> {
        let root: Table = toml::from_str(content)?;
        let mut entries = Vec::new();
        for (group_key, group_value) in root {
            let (Some(group), Value::Table(plots)) = (group_key.strip_prefix(GROUP_PREFIX), group_value) else {
                tracing::warn!("Ignoring unexpected entry '{}' in plot file", group_key);
                continue;
            };
            let group = group.to_string();
            for (plot_key, plot_value) in plots {
                let Value::Table(table) = plot_value else {
                    tracing::warn!("Ignoring unexpected entry '{}' in group {}", plot_key, group);
                    continue;
                };
                if !plot_key.starts_with(PLOT_PREFIX) {
                    tracing::warn!("Ignoring unexpected entry '{}' in group {}", plot_key, group);
                    continue;
                }
                let key = format!("{GROUP_PREFIX}{group}.{plot_key}");
                entries.push((group.clone(), key, table));
            }
        }
        Ok(Self {
            entries,
        })
    }

    /// Read and parse a plot file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read plot file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid plot file: {}", path.display()))
    }

    /// All plot tables in file order.
    pub fn entries(&self) -> impl Iterator<Item = PlotEntry<'_>> {
        self.entries.iter().map(|(group, key, table)| PlotEntry {
            group,
            key,
            table,
        })
    }

    /// Number of plot tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the file holds no plot tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Write `plots` into a plot file, replacing it.
pub fn write_plot_file<'a>(path: &Path, plots: impl IntoIterator<Item = &'a Plot>) -> Result<usize> {
    let mut root = Table::new();
    let mut written = 0;
    for plot in plots {
        let group = root
            .entry(format!("{GROUP_PREFIX}{}", plot.figure_group()))
            .or_insert_with(|| Value::Table(Table::new()));
        if let Value::Table(group) = group {
            group.insert(format!("{PLOT_PREFIX}{}", display_name(plot)), Value::Table(plot_to_table(plot)?));
            written += 1;
        }
    }

    let content = toml::to_string_pretty(&root).context("Failed to serialize plot definitions")?;
    atomic_write(path, content.as_bytes())
        .with_context(|| format!("Cannot write plot file: {}", path.display()))?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::{BoxPosition, DataStyle};
    use tempfile::TempDir;

    fn sample() -> Plot {
        let mut plot = Plot::new("pt.v2", "spectra:pp/13TeV");
        plot.set_template("T1");
        plot.set_control_string("logY");
        for i in 0..11 {
            plot.add_data(&format!("hist{i}"), "A");
        }
        plot.set_current_pad(2);
        plot.add_ratio_styled(
            "hist1",
            "A",
            "hist1",
            "B",
            DataStyle {
                label: Some("A / B".to_string()),
                color: Some(2),
                ..DataStyle::default()
            },
        );
        plot.add_legend_box(Some("legend".to_string()), None, 2);
        plot.add_text_box(
            "preliminary",
            BoxPosition {
                x: 0.1,
                y: 0.9,
                user_coordinates: false,
            },
        );
        plot.set_axis_title("X", "pT");
        plot.set_axis_range("Y", 0.5, 1.5);
        plot.set_current_pad(1);
        plot
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(&sample()), "pt_v2_IN_spectra:pp|13TeV");
    }

    #[test]
    fn test_write_and_read_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plots.toml");
        let plot = sample();
        assert_eq!(write_plot_file(&path, [&plot]).unwrap(), 1);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("GROUP::spectra"));
        assert!(content.contains("type = \"ratio\""));

        let file = PlotFile::load(&path).unwrap();
        assert_eq!(file.len(), 1);
        let entry = file.entries().next().unwrap();
        assert_eq!(entry.group, "spectra");
        assert_eq!(
            entry.header().unwrap(),
            ("pt.v2".to_string(), "spectra".to_string(), "pp/13TeV".to_string())
        );

        let read = entry.to_plot().unwrap();
        assert_eq!(read, plot);
        // DATA_10 sorts after DATA_9
        assert_eq!(read.pads()[&1].data[10].primary().name, "hist10");
    }

    #[test]
    fn test_malformed_plot_is_an_error() {
        let content = r#"
            ["GROUP::g"."PLOT::a_IN_g"]
            name = "a"
            figureGroup = "g"

            ["GROUP::g"."PLOT::a_IN_g".PAD_1.DATA_1]
            type = "histogram"
            name = "x"

            ["GROUP::g"."PLOT::b_IN_g"]
            figureGroup = "g"
        "#;
        let file = PlotFile::parse(content).unwrap();
        let results: Vec<_> = file.entries().map(|entry| entry.to_plot()).collect();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| matches!(r, Err(PlotError::PlotDefinitionInvalid { .. }))));
    }

    #[test]
    fn test_unexpected_tables_are_skipped() {
        let content = r#"
            version = 1
            [other]
            x = 1
            ["GROUP::g"."PLOT::a_IN_g"]
            name = "a"
            figureGroup = "g"
        "#;
        let file = PlotFile::parse(content).unwrap();
        assert_eq!(file.len(), 1);
    }
}
