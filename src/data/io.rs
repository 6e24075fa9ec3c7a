//! Reading and writing container files.

use anyhow::{Context, Result};
use std::path::Path;

use super::Directory;
use crate::core::PlotError;
use crate::utils::atomic_write;

/// Open a container file and return its top-level directory.
///
/// The directory is named after the path. All children start out as lazy keys.
///
/// # Errors
///
/// [`PlotError::InputFileNotFound`] if the file does not exist, a JSON error if it is not a
/// directory document.
pub fn open_container_file(path: &Path) -> Result<Directory> {
    if !path.is_file() {
        return Err(PlotError::InputFileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read input file: {}", path.display()))?;
    let directory = Directory::from_json(path.display().to_string(), &content)?;
    tracing::debug!("Opened {} with {} top-level keys", path.display(), directory.keys().len());
    Ok(directory)
}

/// Write `directory` as a container file.
pub fn write_container_file(path: &Path, directory: &Directory) -> Result<()> {
    let json = directory.to_json()?;
    atomic_write(path, json.as_bytes())
        .with_context(|| format!("Cannot write container file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Container, Dataset, Object};
    use tempfile::TempDir;

    #[test]
    fn test_write_then_open() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fileA.json");

        let mut dir = Directory::new("ignored");
        dir.push_object(Object::Data(Dataset::graph("g", vec![])));
        write_container_file(&path, &dir).unwrap();

        let opened = open_container_file(&path).unwrap();
        assert_eq!(opened.name(), path.display().to_string());
        assert_eq!(opened.child_names(), vec!["g"]);
    }

    #[test]
    fn test_missing_file() {
        let err = open_container_file(Path::new("/does/not/exist.json")).unwrap_err();
        assert!(matches!(err.downcast_ref::<PlotError>(), Some(PlotError::InputFileNotFound { .. })));
    }
}
