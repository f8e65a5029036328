//! CSV utilities for per-subject metric tables
//!
//! Independent of the conversion itself; they share only the `sub-<label>`
//! convention used to find the subject in a `Filename` column.

mod aggregate;
mod subject;

pub use aggregate::{
    aggregate_levels, collect_levels, LevelAggregate, LEVEL_COLUMN, LEVEL_SEPARATOR, MAP_COLUMN,
    SIZE_COLUMN, STD_COLUMN,
};
pub use subject::{add_subject_column, extract_subject_token};

use crate::error::{BidsError, Result};
use csv::StringRecord;
use std::path::{Path, PathBuf};

/// Column holding the processed file path
pub const FILENAME_COLUMN: &str = "Filename";

/// Column written by [`add_subject_column`]
pub const SUBJECT_COLUMN: &str = "Subject";

/// Returns the index of `name` in the header row
fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| BidsError::MissingColumn(name.to_string()))
}

/// Derives an output path next to `input`: `<stem>_<suffix>.<ext>`
///
/// # Example
///
/// ```
/// use bidsify_core::tabular::default_output_path;
/// use std::path::Path;
///
/// let out = default_output_path(Path::new("results/csa.csv"), "aggregated");
/// assert_eq!(out, Path::new("results/csa_aggregated.csv"));
/// ```
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}_{}", stem, suffix),
    };
    input.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path_without_extension() {
        assert_eq!(
            default_output_path(Path::new("metrics"), "formatted"),
            Path::new("metrics_formatted")
        );
    }

    #[test]
    fn test_column_index_missing() {
        let headers = StringRecord::from(vec!["Filename", "VertLevel"]);
        assert_eq!(column_index(&headers, "VertLevel").unwrap(), 1);
        assert!(matches!(
            column_index(&headers, "MAP()"),
            Err(BidsError::MissingColumn(ref c)) if c == "MAP()"
        ));
    }
}
