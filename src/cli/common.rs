//! Arguments shared by several commands.

use clap::Args;

use crate::core::PlotError;
use crate::plot::PlotSelector;

/// Plot selection by figure group and name.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Figure group selector `group[:category]`, both parts regular expressions.
    ///
    /// An empty part matches anything. May be repeated.
    #[arg(short, long = "group", value_name = "SEL")]
    pub groups: Vec<String>,

    /// Plot name regular expression. May be repeated.
    #[arg(short, long = "name", value_name = "RE")]
    pub names: Vec<String>,
}

impl SelectionArgs {
    /// Compile the selectors. No selectors select every plot.
    pub fn selector(&self) -> Result<PlotSelector, PlotError> {
        PlotSelector::new(&self.groups, &self.names)
    }
}
