//! Global constants used throughout the plotmgr codebase.
//!
//! Separators used to build unique names live here together with the reserved
//! group name and the default file names, so that every module agrees on them.

/// Separator between a dataset name and its source identifier.
///
/// `hist1` from source `A` is registered as `hist1_@_A`.
pub const DATA_SEPARATOR: &str = "_@_";

/// Separator between a plot name and its figure group (and optional category).
///
/// Plot `pt` in group `spectra:pp` has the unique name `pt_IN_spectra:pp`.
pub const GROUP_SEPARATOR: &str = "_IN_";

/// Separator between figure group and figure category.
pub const CATEGORY_SEPARATOR: char = ':';

/// Figure group reserved for plot templates.
pub const TEMPLATE_GROUP: &str = "TEMPLATES";

/// Separator for paths inside container files and dataset names.
pub const PATH_SEPARATOR: char = '/';

/// Default name of the archive written in archive output mode.
pub const DEFAULT_ARCHIVE_FILE_NAME: &str = "ResultPlots.zip";

/// Default directory for generated plots.
pub const DEFAULT_OUTPUT_DIR: &str = "plots";

/// Environment variable that overrides the configuration file location.
pub const CONFIG_ENV_VAR: &str = "PLOTMGR_CONFIG";
