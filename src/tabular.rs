//! Reader for delimited numeric tables.
//!
//! A table becomes a graph dataset. The column pattern decides which columns are used:
//! every `%lg` token reads one column, every `%*lg` token skips one. Read columns are
//! assigned to `x`, `y`, `ex` and `ey` in that order, so `%lg %lg` yields a graph without
//! uncertainties and `%lg %*lg %lg %lg` takes `y` from the third column.
//!
//! Blank lines and lines starting with `#` are ignored.

use std::path::Path;

use crate::core::PlotError;
use crate::data::{Dataset, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Read,
    Skip,
}

fn parse_pattern(pattern: &str, file: &str) -> Result<Vec<Column>, PlotError> {
    let columns = pattern
        .split_whitespace()
        .map(|token| match token {
            "%lg" | "%f" | "%g" => Ok(Column::Read),
            "%*lg" | "%*f" | "%*g" => Ok(Column::Skip),
            other => Err(PlotError::TabularParse {
                file: file.to_string(),
                line: 0,
                reason: format!("unknown column pattern token '{other}'"),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let read = columns.iter().filter(|c| **c == Column::Read).count();
    if !(2..=4).contains(&read) {
        return Err(PlotError::TabularParse {
            file: file.to_string(),
            line: 0,
            reason: format!("column pattern '{pattern}' must read between 2 and 4 columns, reads {read}"),
        });
    }
    Ok(columns)
}

/// Parse table `content` into points.
///
/// `file` is only used in error messages.
pub fn parse_delimited(
    content: &str,
    column_pattern: &str,
    delimiter: &str,
    file: &str,
) -> Result<Vec<Point>, PlotError> {
    let columns = parse_pattern(column_pattern, file)?;
    let mut points = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed
            .split(|c: char| delimiter.contains(c) || c.is_whitespace())
            .filter(|field| !field.is_empty())
            .collect();
        if fields.len() < columns.len() {
            return Err(PlotError::TabularParse {
                file: file.to_string(),
                line: index + 1,
                reason: format!("expected {} columns, found {}", columns.len(), fields.len()),
            });
        }

        let mut values = [0.0_f64; 4];
        let mut slot = 0;
        for (column, field) in columns.iter().zip(&fields) {
            if *column == Column::Skip {
                continue;
            }
            values[slot] = field.parse().map_err(|_| PlotError::TabularParse {
                file: file.to_string(),
                line: index + 1,
                reason: format!("'{field}' is not a number"),
            })?;
            slot += 1;
        }

        points.push(Point {
            x: values[0],
            y: values[1],
            ex: values[2],
            ey: values[3],
        });
    }
    Ok(points)
}

/// Read a delimited table into a graph named after the file's base name.
///
/// # Errors
///
/// [`PlotError::IoError`] if the file cannot be read, [`PlotError::TabularParse`] for an
/// invalid pattern or a malformed line.
pub fn read_delimited(path: &Path, column_pattern: &str, delimiter: &str) -> Result<Dataset, PlotError> {
    let content = std::fs::read_to_string(path)?;
    let file = path.display().to_string();
    let points = parse_delimited(&content, column_pattern, delimiter, &file)?;

    let name = path.file_stem().map_or_else(|| file.clone(), |stem| stem.to_string_lossy().into_owned());
    tracing::debug!("Read {} points from {}", points.len(), file);
    Ok(Dataset::graph(name, points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_four_columns() {
        let content = "# pt\tyield\tept\teyield\n1\t10\t0.5\t1\n2\t20\t0.5\t2\n\n";
        let points = parse_delimited(content, "%lg %lg %lg %lg", "\t", "t.csv").unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(
            points[1],
            Point {
                x: 2.0,
                y: 20.0,
                ex: 0.5,
                ey: 2.0
            }
        );
    }

    #[test]
    fn test_skipped_columns_and_other_delimiter() {
        let content = "1,99,10,3\n";
        let points = parse_delimited(content, "%lg %*lg %lg %lg", ",", "t.csv").unwrap();
        assert_eq!(
            points[0],
            Point {
                x: 1.0,
                y: 10.0,
                ex: 3.0,
                ey: 0.0
            }
        );
    }

    #[test]
    fn test_malformed_line() {
        let err = parse_delimited("1\t2\t3\t4\n1\tx\t3\t4\n", "%lg %lg %lg %lg", "\t", "t.csv").unwrap_err();
        match err {
            PlotError::TabularParse {
                line,
                reason,
                ..
            } => {
                assert_eq!(line, 2);
                assert!(reason.contains("'x'"));
            }
            other => panic!("unexpected error {other:?}"),
        }

        assert!(parse_delimited("1\t2\n", "%lg %lg %lg", "\t", "t.csv").is_err());
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(parse_delimited("", "%lg", "\t", "t.csv").is_err());
        assert!(parse_delimited("", "%lg %d", "\t", "t.csv").is_err());
    }

    #[test]
    fn test_read_file_uses_base_name() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pion_yield.csv");
        std::fs::write(&path, "1\t2\t0\t0.1\n").unwrap();

        let dataset = read_delimited(&path, "%lg %lg %lg %lg", "\t").unwrap();
        assert_eq!(dataset.name(), "pion_yield");
        assert_eq!(dataset.len(), 1);
    }
}
