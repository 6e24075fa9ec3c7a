//! Integration test suite for plotmgr
//!
//! End-to-end tests of dataset resolution, plot generation and the command-line interface.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **common**: Shared fixtures (input files, plot files, CLI invocation)
//! - **extraction**: Extraction and cross-file resolution against files on disk
//! - **generation**: Plot generation through the manager, templates and the ledger
//! - **cli**: The `plotmgr` binary

mod cli;
mod common;
mod extraction;
mod generation;
