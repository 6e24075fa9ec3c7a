//! Applying a template to a plot.
//!
//! The template provides defaults, the plot overrides them:
//!
//! - Identity (name, group, category, template name) always comes from the plot.
//! - Plot style and per-pad control strings: the plot's value if set, else the template's.
//! - Pads are matched by pad number. A pad only one side defines is taken as is.
//! - Axes are matched by axis name and merged field by field, so a plot that only sets an
//!   axis range still inherits the template's axis title.
//! - Data and box lists are taken whole: the plot's list if it is non-empty, else the
//!   template's. Entries of these lists have no stable key to match on.

use std::collections::BTreeMap;

use super::{Axis, Pad, Plot};

/// Fill the unset parts of `plot` from `template`.
#[must_use]
pub fn merge(template: &Plot, plot: &Plot) -> Plot {
    let mut merged = plot.clone();
    if merged.plot_style.is_none() {
        merged.plot_style.clone_from(&template.plot_style);
    }

    let pads = merged.pads_mut();
    for (id, template_pad) in template.pads() {
        match pads.get_mut(id) {
            Some(pad) => merge_pad(template_pad, pad),
            None => {
                pads.insert(*id, template_pad.clone());
            }
        }
    }
    merged
}

fn merge_pad(template: &Pad, pad: &mut Pad) {
    if pad.control_string.is_none() {
        pad.control_string.clone_from(&template.control_string);
    }
    if pad.data.is_empty() {
        pad.data.clone_from(&template.data);
    }
    if pad.boxes.is_empty() {
        pad.boxes.clone_from(&template.boxes);
    }
    merge_axes(&template.axes, &mut pad.axes);
}

fn merge_axes(template: &BTreeMap<String, Axis>, axes: &mut BTreeMap<String, Axis>) {
    for (name, template_axis) in template {
        let axis = axes.entry(name.clone()).or_default();
        if axis.title.is_none() {
            axis.title.clone_from(&template_axis.title);
        }
        if axis.range.is_none() {
            axis.range = template_axis.range;
        }
        if axis.log.is_none() {
            axis.log = template_axis.log;
        }
    }
}
