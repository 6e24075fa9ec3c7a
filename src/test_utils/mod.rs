//! Test utilities for plotmgr
//!
//! Helpers for building container files, delimited tables and plot files on disk, plus a
//! once-only log subscriber for tests and [`capture_logs`] for asserting on emitted events.
//!
//! # Example
//!
//! ```rust,no_run
//! use plotmgr_cli::test_utils::DirectoryBuilder;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let path = DirectoryBuilder::root()
//!     .graph("hist1", 3)
//!     .directory(DirectoryBuilder::new("sub").histogram("hist2", &[0.0, 1.0, 2.0], &[4.0, 5.0]))
//!     .write(&temp.path().join("fileA.json"))
//!     .unwrap();
//! ```

use anyhow::Result;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once, PoisonError};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

use crate::data::io::write_container_file;
use crate::data::{Dataset, Directory, Histogram, Object, ObjectList, Point};

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` if given, otherwise `RUST_LOG`. Without either, nothing is installed.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// Formatted log output collected by [`capture_logs`].
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Everything that was logged.
    #[must_use]
    pub fn output(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Number of `WARN` events.
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.output().lines().filter(|line| line.contains(" WARN ")).count()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a thread-local subscriber that records warnings and errors.
///
/// ```rust,no_run
/// use plotmgr_cli::test_utils::capture_logs;
///
/// let ((), logs) = capture_logs(|| tracing::warn!("replaced"));
/// assert_eq!(logs.warnings(), 1);
/// ```
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, LogCapture) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_max_level(Level::WARN)
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture)
}

/// `n` points on the line `y = 2x` starting at `x = 1`.
#[must_use]
fn sample_points(n: usize) -> Vec<Point> {
    (1..=n)
        .map(|i| {
            let x = i as f64;
            Point {
                x,
                y: 2.0 * x,
                ex: 0.0,
                ey: 0.1,
            }
        })
        .collect()
}

/// Builder for directory trees written as container files.
#[derive(Debug, Clone)]
pub struct DirectoryBuilder {
    directory: Directory,
}

impl DirectoryBuilder {
    /// A named subdirectory.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            directory: Directory::new(name),
        }
    }

    /// The unnamed top-level directory of a file.
    #[must_use]
    pub fn root() -> Self {
        Self::new("")
    }

    /// Add a graph of `points` points on the line `y = 2x`.
    #[must_use]
    pub fn graph(mut self, name: &str, points: usize) -> Self {
        self.directory.push_object(Dataset::graph(name, sample_points(points)).into());
        self
    }

    /// Add a histogram. `edges` must have one entry more than `contents`.
    #[must_use]
    pub fn histogram(mut self, name: &str, edges: &[f64], contents: &[f64]) -> Self {
        let histogram = Histogram {
            edges: edges.to_vec(),
            contents: contents.to_vec(),
            errors: Vec::new(),
        };
        self.directory.push_object(Dataset::histogram(name, histogram).into());
        self
    }

    /// Add a nested directory.
    #[must_use]
    pub fn directory(mut self, child: Self) -> Self {
        self.directory.push_object(child.build().into());
        self
    }

    /// Add a list holding graphs with the given names.
    #[must_use]
    pub fn list(mut self, name: &str, graphs: &[&str]) -> Self {
        let items: Vec<Object> = graphs.iter().map(|g| Dataset::graph(*g, sample_points(2)).into()).collect();
        self.directory.push_object(ObjectList::from_items(name, items).into());
        self
    }

    #[must_use]
    pub fn build(self) -> Directory {
        self.directory
    }

    /// Write the tree as a container file and return its path.
    pub fn write(self, path: &Path) -> Result<PathBuf> {
        write_container_file(path, &self.directory)?;
        Ok(path.to_path_buf())
    }
}

/// Write a tab-separated table with four columns per row.
pub fn write_table(path: &Path, rows: &[[f64; 4]]) -> Result<PathBuf> {
    let mut content = String::from("# x\ty\tex\tey\n");
    for row in rows {
        let cells: Vec<String> = row.iter().map(f64::to_string).collect();
        content.push_str(&cells.join("\t"));
        content.push('\n');
    }
    std::fs::write(path, content)?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Container;
    use tempfile::TempDir;

    #[test]
    fn test_builder_writes_lazy_keys() {
        let temp = TempDir::new().unwrap();
        let path = DirectoryBuilder::root()
            .graph("hist1", 3)
            .directory(DirectoryBuilder::new("sub").graph("hist2", 1))
            .list("list", &["a", "b"])
            .write(&temp.path().join("f.json"))
            .unwrap();

        let directory = crate::data::io::open_container_file(&path).unwrap();
        assert!(directory.objects().is_empty());
        assert_eq!(directory.child_names(), vec!["hist1", "sub", "list"]);
    }

    #[test]
    fn test_capture_logs_counts_warnings() {
        let (value, logs) = capture_logs(|| {
            tracing::info!("not recorded");
            tracing::warn!("first");
            tracing::error!("failed");
            tracing::warn!("second\nspans lines");
            7
        });
        assert_eq!(value, 7);
        assert_eq!(logs.warnings(), 2);
        assert!(logs.output().contains("spans lines"));
        assert!(!logs.output().contains("not recorded"));
    }

    #[test]
    fn test_write_table() {
        let temp = TempDir::new().unwrap();
        let path = write_table(&temp.path().join("t.csv"), &[[1.0, 2.0, 0.0, 0.5]]).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.ends_with("1\t2\t0\t0.5\n"));
    }
}
