//! Flushing ledger artifacts into a zip archive.
//!
//! Artifacts are stored as `<group>[/<category>]/<file>.<ext>`, with one directory entry
//! per distinct directory.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

use crate::output::Artifact;
use crate::utils::ensure_dir;

fn archive_path(path: &Path) -> String {
    path.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/")
}

/// Write `artifacts` into a new archive at `path`, replacing an existing one.
///
/// Returns the number of stored artifacts.
pub fn write_archive<'a>(
    path: &Path,
    artifacts: impl IntoIterator<Item = &'a Artifact>,
    use_unique_names: bool,
) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Cannot create archive: {}", path.display()))?;
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut directories = BTreeSet::new();
    let mut stored = 0;
    for artifact in artifacts {
        let dir = archive_path(&artifact.relative_dir());
        if directories.insert(dir.clone()) {
            writer.add_directory(format!("{dir}/"), options).with_context(|| format!("Cannot add {dir}"))?;
        }

        let name = format!("{dir}/{}", artifact.file_name(use_unique_names));
        writer.start_file(name.as_str(), options).with_context(|| format!("Cannot add {name}"))?;
        writer.write_all(&artifact.content).with_context(|| format!("Cannot write {name}"))?;
        stored += 1;
    }

    writer.finish().with_context(|| format!("Cannot finish archive: {}", path.display()))?;
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    fn artifact(name: &str, category: &str) -> Artifact {
        Artifact {
            unique_name: format!("{name}_IN_spectra:{category}"),
            name: name.to_string(),
            figure_group: "spectra".to_string(),
            figure_category: category.to_string(),
            extension: "json".to_string(),
            content: name.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_archive_layout() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out/ResultPlots.zip");
        let artifacts = [artifact("pt", "pp/13TeV"), artifact("eta", "pp/13TeV"), artifact("pt", "")];

        assert_eq!(write_archive(&path, &artifacts, false).unwrap(), 3);

        let mut archive = zip::ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "spectra/",
                "spectra/pp/13TeV/",
                "spectra/pp/13TeV/eta.json",
                "spectra/pp/13TeV/pt.json",
                "spectra/pt.json",
            ]
        );

        let mut content = String::new();
        archive.by_name("spectra/pp/13TeV/eta.json").unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "eta");
    }
}
