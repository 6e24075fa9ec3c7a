//! User configuration file (`~/.plotmgr/config.toml`).
//!
//! Every field has a default, so an empty or missing file yields a working configuration.
//!
//! ```toml
//! output_dir = "~/results/plots"
//! output_mode = "archive"
//! archive_file_name = "ResultPlots.zip"
//! use_unique_plot_names = false
//! container_extensions = ["json"]
//!
//! [tabular]
//! delimiter = "\t"
//! column_pattern = "%lg %lg %lg %lg"
//! extensions = ["csv", "txt"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::parse_config;
use crate::constants::{CONFIG_ENV_VAR, DEFAULT_ARCHIVE_FILE_NAME, DEFAULT_OUTPUT_DIR};
use crate::core::PlotError;
use crate::output::OutputMode;
use crate::source::FileRef;
use crate::utils::expand_path;

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

fn default_archive_file_name() -> String {
    DEFAULT_ARCHIVE_FILE_NAME.to_string()
}

fn default_container_extensions() -> Vec<String> {
    vec!["json".to_string()]
}

/// Settings of the delimited table reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabularSettings {
    /// Column delimiter; runs of whitespace are accepted as well
    pub delimiter: String,
    /// Column pattern, e.g. `%lg %lg %*lg %lg`
    pub column_pattern: String,
    /// File extensions read as tables
    pub extensions: Vec<String>,
}

impl Default for TabularSettings {
    fn default() -> Self {
        Self {
            delimiter: "\t".to_string(),
            column_pattern: "%lg %lg %lg %lg".to_string(),
            extensions: vec!["csv".to_string()],
        }
    }
}

/// How an input file is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Hierarchical container file
    Container,
    /// Delimited numeric table
    Tabular,
    /// Not readable, skipped
    Unsupported,
}

/// User configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use plotmgr_cli::config::Config;
/// use plotmgr_cli::output::OutputMode;
///
/// let mut config = Config::default();
/// config.output_mode = OutputMode::Archive;
/// assert_eq!(config.archive_file_name, "ResultPlots.zip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory all plots are written to. `~` and `$VAR` are expanded.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Whether artifacts are written immediately or batched into one archive.
    #[serde(default)]
    pub output_mode: OutputMode,

    /// Name of the archive inside `output_dir` in archive mode.
    #[serde(default = "default_archive_file_name")]
    pub archive_file_name: String,

    /// Name output files after the plot's unique name instead of its plain name.
    #[serde(default)]
    pub use_unique_plot_names: bool,

    /// File extensions read as hierarchical container files.
    #[serde(default = "default_container_extensions")]
    pub container_extensions: Vec<String>,

    /// Delimited table reader settings.
    #[serde(default)]
    pub tabular: TabularSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            output_mode: OutputMode::default(),
            archive_file_name: default_archive_file_name(),
            use_unique_plot_names: false,
            container_extensions: default_container_extensions(),
            tabular: TabularSettings::default(),
        }
    }
}

impl Config {
    /// Load the configuration from the first location that applies.
    ///
    /// 1. `path`, if given (must exist)
    /// 2. `$PLOTMGR_CONFIG`, if set (must exist)
    /// 3. `~/.plotmgr/config.toml`, if it exists
    /// 4. built-in defaults
    ///
    /// # Errors
    ///
    /// Fails if an explicitly named file is missing or if a file cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(path);
        }
        if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
            let path = expand_path(&env_path)?;
            return Self::load_from(&path)
                .with_context(|| format!("Config file named by ${CONFIG_ENV_VAR} is unusable"));
        }
        match Self::default_path() {
            Ok(path) if path.is_file() => Self::load_from(&path),
            _ => {
                tracing::debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load the configuration from `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed, or with [`PlotError::ConfigError`] if the
    /// values are inconsistent.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config: Self = parse_config(path)?;
        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check values that parse but cannot work together.
    pub fn validate(&self) -> Result<(), PlotError> {
        if self.tabular.delimiter.is_empty() {
            return Err(PlotError::ConfigError {
                message: "tabular.delimiter must not be empty".to_string(),
            });
        }
        if self.archive_file_name.trim().is_empty() {
            return Err(PlotError::ConfigError {
                message: "archive_file_name must not be empty".to_string(),
            });
        }
        let shared = self.container_extensions.iter().find(|ext| {
            self.tabular.extensions.iter().any(|other| other.eq_ignore_ascii_case(ext))
        });
        if let Some(ext) = shared {
            return Err(PlotError::ConfigError {
                message: format!("Extension '{ext}' is listed as both container and table format"),
            });
        }
        Ok(())
    }

    /// Default location of the configuration file.
    ///
    /// # Errors
    ///
    /// Fails if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?;
        Ok(home.join(".plotmgr").join("config.toml"))
    }

    /// The output directory with `~` and variables expanded.
    pub fn output_path(&self) -> Result<PathBuf> {
        expand_path(&self.output_dir)
    }

    /// Decide how a file is read from its extension.
    #[must_use]
    pub fn file_kind(&self, file: &FileRef) -> FileKind {
        let Some(extension) = file.extension() else {
            return FileKind::Unsupported;
        };
        let matches = |list: &[String]| list.iter().any(|ext| ext.eq_ignore_ascii_case(&extension));
        if matches(&self.container_extensions) {
            FileKind::Container
        } else if matches(&self.tabular.extensions) {
            FileKind::Tabular
        } else {
            FileKind::Unsupported
        }
    }
}
