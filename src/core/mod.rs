//! Core types shared by every plotmgr subsystem.
//!
//! Currently this is the error system: [`PlotError`] for typed failures and
//! [`ErrorContext`] / [`user_friendly_error`] for presenting them on the command line.

pub mod error;

pub use error::{ErrorContext, PlotError, user_friendly_error};
