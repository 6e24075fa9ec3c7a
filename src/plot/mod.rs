//! Plot definitions.
//!
//! A [`Plot`] is a named, grouped tree of pads. Each [`Pad`] holds an ordered list of data
//! entries, decoration boxes and axis settings. Plots may name a template whose settings
//! fill in whatever the plot leaves unset (see [`merge`]).
//!
//! Plots are usually built in code and persisted to, or loaded from, TOML plot files
//! (see [`io`]):
//!
//! ```rust
//! use plotmgr_cli::plot::Plot;
//!
//! let mut plot = Plot::new("pt_spectrum", "spectra:pp");
//! plot.set_template("T1");
//! plot.add_data("hist1", "A");
//! plot.add_ratio("hist1", "A", "hist1", "B");
//! plot.set_axis_title("Y", "yield");
//!
//! assert_eq!(plot.unique_name(), "pt_spectrum_IN_spectra:pp");
//! assert_eq!(plot.data_refs().count(), 3);
//! ```

pub mod io;
pub mod merge;
pub mod selection;

pub use merge::merge;
pub use selection::PlotSelector;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{CATEGORY_SEPARATOR, DATA_SEPARATOR, GROUP_SEPARATOR};

/// Borrowed `(name, source)` reference to a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataRef<'a> {
    /// Dataset name, possibly with a path
    pub name: &'a str,
    /// Input identifier
    pub input: &'a str,
}

impl DataRef<'_> {
    /// `name_@_input`
    #[must_use]
    pub fn unique_name(&self) -> String {
        format!("{}{DATA_SEPARATOR}{}", self.name, self.input)
    }
}

impl fmt::Display for DataRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.input)
    }
}

/// Drawing attributes of a data entry. Passed through to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_options: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<(f64, f64)>,
}

impl DataStyle {
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Single dataset drawn on a pad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSpec {
    pub name: String,
    #[serde(rename = "inputIdentifier")]
    pub input: String,
    #[serde(default, skip_serializing_if = "DataStyle::is_default")]
    pub style: DataStyle,
}

/// Ratio of two datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioSpec {
    pub name: String,
    #[serde(rename = "inputIdentifier")]
    pub input: String,
    #[serde(rename = "denomName")]
    pub denom_name: String,
    #[serde(rename = "denomIdentifier")]
    pub denom_input: String,
    #[serde(default, skip_serializing_if = "DataStyle::is_default")]
    pub style: DataStyle,
}

/// Entry of a pad's data list, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DataEntry {
    /// Plain dataset
    Data(DataSpec),
    /// Numerator divided by denominator
    Ratio(RatioSpec),
}

impl DataEntry {
    /// The primary reference (the numerator for ratios).
    #[must_use]
    pub fn primary(&self) -> DataRef<'_> {
        match self {
            Self::Data(spec) => DataRef {
                name: &spec.name,
                input: &spec.input,
            },
            Self::Ratio(spec) => DataRef {
                name: &spec.name,
                input: &spec.input,
            },
        }
    }

    /// The denominator, for ratios.
    #[must_use]
    pub fn denominator(&self) -> Option<DataRef<'_>> {
        match self {
            Self::Data(_) => None,
            Self::Ratio(spec) => Some(DataRef {
                name: &spec.denom_name,
                input: &spec.denom_input,
            }),
        }
    }

    /// Every dataset the entry needs.
    pub fn references(&self) -> impl Iterator<Item = DataRef<'_>> {
        std::iter::once(self.primary()).chain(self.denominator())
    }

    /// Drawing attributes of the entry.
    #[must_use]
    pub const fn style(&self) -> &DataStyle {
        match self {
            Self::Data(spec) => &spec.style,
            Self::Ratio(spec) => &spec.style,
        }
    }
}

/// Position of a box, in pad coordinates unless `user_coordinates` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxPosition {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub user_coordinates: bool,
}

/// Legend listing the labelled data of a pad.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendBox {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<BoxPosition>,
    #[serde(default = "default_columns")]
    pub columns: u32,
}

const fn default_columns() -> u32 {
    1
}

/// Free text placed on a pad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBox {
    pub text: String,
    pub position: BoxPosition,
}

/// Decoration box of a pad, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlotBox {
    Legend(LegendBox),
    Text(TextBox),
}

/// Settings of one axis. Unset fields come from the template or the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<bool>,
}

/// One pad of a plot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pad {
    /// Free-form drawing instructions for the renderer
    pub control_string: Option<String>,
    /// Data entries in drawing order
    pub data: Vec<DataEntry>,
    /// Decoration boxes in drawing order
    pub boxes: Vec<PlotBox>,
    /// Axis settings by axis name (`X`, `Y`, `Z`, ...)
    pub axes: BTreeMap<String, Axis>,
}

/// `name_IN_group[:category]` from the parts of a plot.
#[must_use]
pub fn unique_plot_name(name: &str, group: &str, category: &str) -> String {
    if category.is_empty() {
        format!("{name}{GROUP_SEPARATOR}{group}")
    } else {
        format!("{name}{GROUP_SEPARATOR}{group}{CATEGORY_SEPARATOR}{category}")
    }
}

/// A named plot within a figure group.
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    name: String,
    figure_group: String,
    figure_category: String,
    plot_style: Option<String>,
    template: Option<String>,
    pads: BTreeMap<u32, Pad>,
    current_pad: u32,
}

impl Plot {
    /// Create a plot. `group` may carry a category after the first `:`.
    pub fn new(name: impl Into<String>, group: &str) -> Self {
        let (figure_group, figure_category) = match group.split_once(CATEGORY_SEPARATOR) {
            Some((group, category)) => (group.to_string(), category.to_string()),
            None => (group.to_string(), String::new()),
        };
        Self {
            name: name.into(),
            figure_group,
            figure_category,
            plot_style: None,
            template: None,
            pads: BTreeMap::new(),
            current_pad: 1,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn figure_group(&self) -> &str {
        &self.figure_group
    }

    #[must_use]
    pub fn figure_category(&self) -> &str {
        &self.figure_category
    }

    /// `name_IN_group[:category]`, the key under which the plot is stored.
    #[must_use]
    pub fn unique_name(&self) -> String {
        unique_plot_name(&self.name, &self.figure_group, &self.figure_category)
    }

    pub(crate) fn set_figure_group(&mut self, group: &str) {
        self.figure_group = group.to_string();
        self.figure_category.clear();
    }

    pub(crate) fn set_figure_category(&mut self, category: impl Into<String>) {
        self.figure_category = category.into();
    }

    #[must_use]
    pub fn plot_style(&self) -> Option<&str> {
        self.plot_style.as_deref()
    }

    pub fn set_plot_style(&mut self, style: impl Into<String>) {
        self.plot_style = Some(style.into());
    }

    /// Name of the template the plot is based on.
    #[must_use]
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    pub fn set_template(&mut self, template: impl Into<String>) {
        self.template = Some(template.into());
    }

    #[must_use]
    pub const fn pads(&self) -> &BTreeMap<u32, Pad> {
        &self.pads
    }

    pub(crate) fn pads_mut(&mut self) -> &mut BTreeMap<u32, Pad> {
        &mut self.pads
    }

    /// Select the pad the builder methods work on. Pads are numbered from 1.
    pub fn set_current_pad(&mut self, pad: u32) {
        self.current_pad = pad;
    }

    fn pad(&mut self) -> &mut Pad {
        self.pads.entry(self.current_pad).or_default()
    }

    fn input_or_group(&self, input: &str) -> String {
        if input.is_empty() {
            self.figure_group.clone()
        } else {
            input.to_string()
        }
    }

    /// Append a dataset. An empty `input` stands for the plot's figure group.
    pub fn add_data(&mut self, name: &str, input: &str) {
        self.add_data_styled(name, input, DataStyle::default());
    }

    /// Append a dataset with drawing attributes.
    pub fn add_data_styled(&mut self, name: &str, input: &str, style: DataStyle) {
        let spec = DataSpec {
            name: name.to_string(),
            input: self.input_or_group(input),
            style,
        };
        self.pad().data.push(DataEntry::Data(spec));
    }

    /// Insert a dataset at the front of the pad that only draws the axis frame.
    pub fn add_frame(&mut self, name: &str, input: &str) {
        let spec = DataSpec {
            name: name.to_string(),
            input: self.input_or_group(input),
            style: DataStyle {
                draw_options: Some("AXIS".to_string()),
                ..DataStyle::default()
            },
        };
        self.pad().data.insert(0, DataEntry::Data(spec));
    }

    /// Append the ratio `numerator / denominator`.
    pub fn add_ratio(&mut self, name: &str, input: &str, denom_name: &str, denom_input: &str) {
        self.add_ratio_styled(name, input, denom_name, denom_input, DataStyle::default());
    }

    /// Append a ratio with drawing attributes.
    pub fn add_ratio_styled(
        &mut self,
        name: &str,
        input: &str,
        denom_name: &str,
        denom_input: &str,
        style: DataStyle,
    ) {
        let spec = RatioSpec {
            name: name.to_string(),
            input: self.input_or_group(input),
            denom_name: denom_name.to_string(),
            denom_input: self.input_or_group(denom_input),
            style,
        };
        self.pad().data.push(DataEntry::Ratio(spec));
    }

    pub fn add_text_box(&mut self, text: impl Into<String>, position: BoxPosition) {
        self.pad().boxes.push(PlotBox::Text(TextBox {
            text: text.into(),
            position,
        }));
    }

    /// Add a legend. Without a position the renderer places it.
    pub fn add_legend_box(&mut self, title: Option<String>, position: Option<BoxPosition>, columns: u32) {
        self.pad().boxes.push(PlotBox::Legend(LegendBox {
            title,
            position,
            columns,
        }));
    }

    fn axis(&mut self, axis: &str) -> &mut Axis {
        self.pad().axes.entry(axis.to_string()).or_default()
    }

    pub fn set_axis_title(&mut self, axis: &str, title: impl Into<String>) {
        self.axis(axis).title = Some(title.into());
    }

    pub fn set_axis_range(&mut self, axis: &str, low: f64, high: f64) {
        self.axis(axis).range = Some((low, high));
    }

    pub fn set_axis_log(&mut self, axis: &str, log: bool) {
        self.axis(axis).log = Some(log);
    }

    pub fn set_control_string(&mut self, control: impl Into<String>) {
        self.pad().control_string = Some(control.into());
    }

    /// Every dataset reference of every pad, denominators included.
    pub fn data_refs(&self) -> impl Iterator<Item = DataRef<'_>> {
        self.pads.values().flat_map(|pad| pad.data.iter()).flat_map(DataEntry::references)
    }
}
