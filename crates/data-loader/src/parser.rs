//! Parsers for the dataset files.
//!
//! - movies.dat: `external_id::title`, one entry per line, id may be empty
//! - similarity.dat: one matrix row per line, whitespace-separated scores
//!
//! Line order is significant in both files: line N of movies.dat is catalog
//! entry N and line N of similarity.dat is its similarity row.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use rayon::prelude::*;
use std::fs;
use std::path::Path;

pub const CATALOG_FILE: &str = "movies.dat";
pub const SIMILARITY_FILE: &str = "similarity.dat";

/// Read a file into its non-blank lines, keeping 1-based line numbers.
fn read_lines(path: &Path) -> Result<Vec<(usize, String)>> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path)?;

    Ok(content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line.to_string()))
        .collect())
}

/// Parse the movies.dat file
pub fn parse_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    let lines = read_lines(path)?;
    let mut entries = Vec::with_capacity(lines.len());

    for (line_no, line) in &lines {
        entries.push(parse_catalog_line(line, *line_no)?);
    }

    Ok(entries)
}

/// Parse a single `external_id::title` line.
///
/// Only the first `::` separates the fields.
fn parse_catalog_line(line: &str, line_no: usize) -> Result<CatalogEntry> {
    let (id_str, title) = line
        .split_once("::")
        .ok_or_else(|| DataLoadError::ParseError {
            file: CATALOG_FILE.to_string(),
            line: line_no,
            reason: "Missing '::' separator".to_string(),
        })?;

    let title = title.trim();
    if title.is_empty() {
        return Err(DataLoadError::ParseError {
            file: CATALOG_FILE.to_string(),
            line: line_no,
            reason: "Missing title".to_string(),
        });
    }

    let id_str = id_str.trim();
    let external_id = if id_str.is_empty() {
        None
    } else {
        Some(
            id_str
                .parse::<ExternalId>()
                .map_err(|e| DataLoadError::ParseError {
                    file: CATALOG_FILE.to_string(),
                    line: line_no,
                    reason: format!("Invalid external id '{}': {}", id_str, e),
                })?,
        )
    };

    Ok(CatalogEntry::new(title, external_id))
}

/// Parse the similarity.dat file into rows
///
/// Rows are parsed in parallel; row order follows line order.
pub fn parse_similarity_rows(path: &Path) -> Result<Vec<Vec<f32>>> {
    let lines = read_lines(path)?;

    lines
        .par_iter()
        .map(|(line_no, line)| parse_similarity_line(line, *line_no))
        .collect()
}

fn parse_similarity_line(line: &str, line_no: usize) -> Result<Vec<f32>> {
    line.split_whitespace()
        .map(|value| {
            value.parse::<f32>().map_err(|e| DataLoadError::ParseError {
                file: SIMILARITY_FILE.to_string(),
                line: line_no,
                reason: format!("Invalid score '{}': {}", value, e),
            })
        })
        .collect()
}

/// Parse similarity.dat straight into a validated square matrix
pub fn parse_similarity(path: &Path) -> Result<SimilarityMatrix> {
    SimilarityMatrix::from_rows(parse_similarity_rows(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_line_with_id() {
        let entry = parse_catalog_line("19995::Avatar", 1).unwrap();
        assert_eq!(entry.title, "Avatar");
        assert_eq!(entry.external_id, Some(19995));
    }

    #[test]
    fn test_parse_catalog_line_without_id() {
        let entry = parse_catalog_line("::Gamma", 3).unwrap();
        assert_eq!(entry.title, "Gamma");
        assert_eq!(entry.external_id, None);
    }

    #[test]
    fn test_parse_catalog_line_title_may_contain_separator() {
        let entry = parse_catalog_line("7::Mission: Impossible::Fallout", 1).unwrap();
        assert_eq!(entry.title, "Mission: Impossible::Fallout");
        assert_eq!(entry.external_id, Some(7));
    }

    #[test]
    fn test_parse_catalog_line_rejects_bad_id() {
        let err = parse_catalog_line("abc::Avatar", 4).unwrap_err();
        match err {
            DataLoadError::ParseError { line, file, .. } => {
                assert_eq!(line, 4);
                assert_eq!(file, CATALOG_FILE);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_catalog_line_rejects_missing_title() {
        assert!(parse_catalog_line("12::   ", 1).is_err());
        assert!(parse_catalog_line("no separator", 1).is_err());
    }

    #[test]
    fn test_parse_similarity_line() {
        let row = parse_similarity_line("1.0 0.25\t0.5", 1).unwrap();
        assert_eq!(row, vec![1.0, 0.25, 0.5]);
    }

    #[test]
    fn test_parse_similarity_line_rejects_garbage() {
        let err = parse_similarity_line("1.0 high 0.5", 9).unwrap_err();
        assert!(err.to_string().contains("line 9"));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = parse_catalog(Path::new("definitely/not/here/movies.dat")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
