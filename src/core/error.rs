//! Error handling for plotmgr
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`PlotError`]) for precise handling inside the library
//! 2. **User-friendly messages** ([`ErrorContext`]) with suggestions for CLI users
//!
//! Library functions that only touch in-memory structures return
//! `Result<T, PlotError>`. Functions that do file I/O return [`anyhow::Result`] and attach
//! context; [`user_friendly_error`] recovers the typed error from the chain when one is present.
//!
//! # Error Categories
//!
//! - **Inputs**: [`PlotError::InputFileNotFound`], [`PlotError::SubPathNotFound`],
//!   [`PlotError::UnresolvedData`], [`PlotError::UnsupportedContainer`]
//! - **Plot definitions**: [`PlotError::ReservedGroupName`], [`PlotError::InvalidName`],
//!   [`PlotError::MissingFigureGroup`], [`PlotError::PlotDefinitionInvalid`]
//! - **Files and formats**: [`PlotError::TabularParse`], [`PlotError::ConfigError`],
//!   [`PlotError::OutputError`], [`PlotError::IoError`], [`PlotError::TomlError`],
//!   [`PlotError::JsonError`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use plotmgr_cli::core::{PlotError, ErrorContext};
//!
//! let context = ErrorContext::new(PlotError::ReservedGroupName {
//!     plot: "pt".to_string(),
//! })
//! .with_suggestion("Use add_template() for templates");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for plotmgr operations
///
/// Each variant corresponds to one failure mode of dataset resolution, plot definition
/// handling or output generation.
#[derive(Error, Debug)]
pub enum PlotError {
    /// An input file could not be opened
    #[error("Input file {path} not found")]
    InputFileNotFound {
        /// The path that was tried
        path: String,
    },

    /// An internal path inside an input file does not exist
    #[error("Subdirectory \"{sub_path}\" not found in \"{file}\"")]
    SubPathNotFound {
        /// The `/`-separated internal path that was requested
        sub_path: String,
        /// The file that was searched
        file: String,
    },

    /// Some requested datasets were found in none of the candidate files
    #[error("{} dataset(s) of source '{source_id}' could not be found", missing.len())]
    UnresolvedData {
        /// Source identifier the datasets belong to
        source_id: String,
        /// Names that stayed unresolved
        missing: Vec<String>,
        /// Every file that was searched
        files: Vec<String>,
    },

    /// A node that was expected to be a container holds a dataset instead
    #[error("Object '{name}' is not a traversable container")]
    UnsupportedContainer {
        /// Name of the offending node
        name: String,
    },

    /// A regular plot tried to use the group reserved for templates
    #[error("Plot '{plot}' uses the reserved group name TEMPLATES")]
    ReservedGroupName {
        /// Name of the rejected plot
        plot: String,
    },

    /// A raw name contains one of the reserved unique-name separators
    #[error("Name '{name}' contains the reserved separator '{separator}'")]
    InvalidName {
        /// The offending name
        name: String,
        /// The separator found inside it
        separator: String,
    },

    /// An id was looked up that the name registry never handed out
    #[error("Unknown name id {id}")]
    UnknownNameId {
        /// The unknown id
        id: usize,
    },

    /// A plot was generated without a figure group
    #[error("No figure group was specified for plot '{plot}'")]
    MissingFigureGroup {
        /// Name of the plot
        plot: String,
    },

    /// A persisted plot definition could not be turned into a plot
    #[error("Could not construct plot {key} from definition file: {reason}")]
    PlotDefinitionInvalid {
        /// Table key of the definition (`GROUP::...`/`PLOT::...`)
        key: String,
        /// What was wrong with it
        reason: String,
    },

    /// A delimited table could not be parsed
    #[error("Failed to parse {file} line {line}: {reason}")]
    TabularParse {
        /// File being read
        file: String,
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Output could not be written
    #[error("Failed to write output {path}: {reason}")]
    OutputError {
        /// Target path
        path: String,
        /// Underlying reason
        reason: String,
    },

    /// IO error from the standard library
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error(transparent)]
    TomlError(#[from] toml::de::Error),

    /// JSON parsing or serialization error
    #[error("Invalid JSON in {context}: {reason}")]
    JsonError {
        /// What was being read or written
        context: String,
        /// Parser message
        reason: String,
    },

    /// Generic error for cases not covered by specific variants
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for PlotError {
    fn clone(&self) -> Self {
        match self {
            Self::InputFileNotFound {
                path,
            } => Self::InputFileNotFound {
                path: path.clone(),
            },
            Self::SubPathNotFound {
                sub_path,
                file,
            } => Self::SubPathNotFound {
                sub_path: sub_path.clone(),
                file: file.clone(),
            },
            Self::UnresolvedData {
                source_id,
                missing,
                files,
            } => Self::UnresolvedData {
                source_id: source_id.clone(),
                missing: missing.clone(),
                files: files.clone(),
            },
            Self::UnsupportedContainer {
                name,
            } => Self::UnsupportedContainer {
                name: name.clone(),
            },
            Self::ReservedGroupName {
                plot,
            } => Self::ReservedGroupName {
                plot: plot.clone(),
            },
            Self::InvalidName {
                name,
                separator,
            } => Self::InvalidName {
                name: name.clone(),
                separator: separator.clone(),
            },
            Self::UnknownNameId {
                id,
            } => Self::UnknownNameId {
                id: *id,
            },
            Self::MissingFigureGroup {
                plot,
            } => Self::MissingFigureGroup {
                plot: plot.clone(),
            },
            Self::PlotDefinitionInvalid {
                key,
                reason,
            } => Self::PlotDefinitionInvalid {
                key: key.clone(),
                reason: reason.clone(),
            },
            Self::TabularParse {
                file,
                line,
                reason,
            } => Self::TabularParse {
                file: file.clone(),
                line: *line,
                reason: reason.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::OutputError {
                path,
                reason,
            } => Self::OutputError {
                path: path.clone(),
                reason: reason.clone(),
            },
            // io::Error is not Clone, rebuild it from kind and message
            Self::IoError(e) => Self::IoError(std::io::Error::new(e.kind(), e.to_string())),
            Self::TomlError(e) => Self::TomlError(e.clone()),
            Self::JsonError {
                context,
                reason,
            } => Self::JsonError {
                context: context.clone(),
                reason: reason.clone(),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

impl PlotError {
    /// Wrap a `serde_json` error together with what was being processed.
    pub fn json(context: impl Into<String>, error: &serde_json::Error) -> Self {
        Self::JsonError {
            context: context.into(),
            reason: error.to_string(),
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// Combines a [`PlotError`] with an optional suggestion and optional details. The CLI
/// prints it via [`ErrorContext::display`].
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: PlotError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without suggestion or details
    #[must_use]
    pub const fn new(error: PlotError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`]
///
/// Typed [`PlotError`]s anywhere in the chain get tailored suggestions, IO and TOML
/// errors get generic file guidance, everything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(plot_error) = error.chain().find_map(|e| e.downcast_ref::<PlotError>()) {
        let context = create_error_context(plot_error.clone());
        let outermost = error.chain().next().and_then(|e| e.downcast_ref::<PlotError>());
        if outermost.is_some() {
            return context;
        }
        // The typed error sits deeper in the chain, keep the outer message as details
        return context.with_details(error.to_string());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(PlotError::Other {
                    message: error.to_string(),
                })
                .with_suggestion("Check file ownership and permissions of the input and output paths");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(PlotError::Other {
                    message: error.to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(PlotError::TomlError(toml_error.clone()))
            .with_suggestion("Check the TOML syntax. Verify quotes, brackets, and table headers");
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(PlotError::Other {
        message,
    })
}

/// Map each [`PlotError`] variant to an [`ErrorContext`] with tailored suggestions
fn create_error_context(error: PlotError) -> ErrorContext {
    match &error {
        PlotError::InputFileNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the file paths registered for this input identifier"),
        PlotError::SubPathNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the part after ':' in the input file reference"),
        PlotError::UnresolvedData {
            files,
            ..
        } => {
            let details = format!("Searched files: {}", files.join(", "));
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Check dataset names and the input identifier of the plot")
        }
        PlotError::ReservedGroupName {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Register templates with add_template() or choose another group"),
        PlotError::InvalidName {
            ..
        } => ErrorContext::new(error)
            .with_details("'_@_' and '_IN_' are used to build unique names")
            .with_suggestion("Rename the dataset, identifier or plot"),
        PlotError::TomlError(_)
        | PlotError::PlotDefinitionInvalid {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the TOML syntax and the table layout of the plot file"),
        PlotError::ConfigError {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Check the configuration file (--config, $PLOTMGR_CONFIG or ~/.plotmgr/config.toml)",
        ),
        PlotError::OutputError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check that the output directory is writable"),
        _ => ErrorContext::new(error),
    }
}
