//! Selecting plots by figure group, category and name.
//!
//! Group selectors have the form `group[:category]`; both parts are regular expressions
//! that must match the whole value, and an empty part matches anything. Name selectors are
//! regular expressions as well. An empty selector list selects everything.

use regex::Regex;

use crate::constants::CATEGORY_SEPARATOR;
use crate::core::PlotError;

use super::Plot;

#[derive(Debug, Clone)]
struct GroupSelector {
    group: Regex,
    category: Regex,
}

/// Compiled group and name selectors.
#[derive(Debug, Clone, Default)]
pub struct PlotSelector {
    groups: Vec<GroupSelector>,
    names: Vec<Regex>,
}

fn anchored(pattern: &str) -> Result<Regex, PlotError> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|e| PlotError::Other {
        message: format!("Invalid selector '{pattern}': {e}"),
    })
}

impl PlotSelector {
    /// Select every plot.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Compile group selectors (`group[:category]`) and name patterns.
    ///
    /// # Errors
    ///
    /// Fails for invalid regular expressions and for group selectors with more than one `:`.
    pub fn new<S: AsRef<str>>(groups: &[S], names: &[S]) -> Result<Self, PlotError> {
        let mut selector = Self::default();
        for raw in groups {
            let raw = raw.as_ref();
            let parts: Vec<&str> = raw.split(CATEGORY_SEPARATOR).collect();
            if parts.len() > 2 {
                return Err(PlotError::Other {
                    message: format!(
                        "Group selector '{raw}' contains more than one ':'. Colons only separate figure group and category"
                    ),
                });
            }
            let part = |index: usize| parts.get(index).copied().filter(|p| !p.is_empty()).unwrap_or(".*");
            selector.groups.push(GroupSelector {
                group: anchored(part(0))?,
                category: anchored(part(1))?,
            });
        }
        for name in names {
            selector.names.push(anchored(name.as_ref())?);
        }
        Ok(selector)
    }

    /// Select exactly one plot name in one `group[:category]`.
    pub fn exact(name: &str, group: &str) -> Result<Self, PlotError> {
        let (group, category) = group.split_once(CATEGORY_SEPARATOR).unwrap_or((group, ""));
        Ok(Self {
            groups: vec![GroupSelector {
                group: anchored(&regex::escape(group))?,
                category: anchored(&regex::escape(category))?,
            }],
            names: vec![anchored(&regex::escape(name))?],
        })
    }

    /// Whether a plot with these properties is selected.
    #[must_use]
    pub fn matches(&self, group: &str, category: &str, name: &str) -> bool {
        let group_ok =
            self.groups.is_empty() || self.groups.iter().any(|s| s.group.is_match(group) && s.category.is_match(category));
        let name_ok = self.names.is_empty() || self.names.iter().any(|r| r.is_match(name));
        group_ok && name_ok
    }

    /// Whether `plot` is selected.
    #[must_use]
    pub fn matches_plot(&self, plot: &Plot) -> bool {
        self.matches(plot.figure_group(), plot.figure_category(), plot.name())
    }

    /// Literal names this selector asks for, if every name pattern is a plain word.
    ///
    /// Used to warn about requested plots that do not exist.
    #[must_use]
    pub fn literal_names(&self) -> Vec<String> {
        self.names
            .iter()
            .map(|r| {
                let source = r.as_str();
                source.strip_prefix("^(?:").and_then(|s| s.strip_suffix(")$")).unwrap_or(source)
            })
            .filter(|s| s.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-'))
            .map(str::to_string)
            .collect()
    }
}
