use super::{column_index, extract_subject_token, FILENAME_COLUMN};
use crate::error::{BidsError, Result};
use csv::{ReaderBuilder, Writer};
use log::debug;
use std::collections::BTreeMap;
use std::io::{Read, Write};

pub const LEVEL_COLUMN: &str = "VertLevel";
pub const SIZE_COLUMN: &str = "Size [vox]";
pub const MAP_COLUMN: &str = "MAP()";
pub const STD_COLUMN: &str = "STD()";

/// Separator between levels in a multi-level `VertLevel` cell (`2:3`)
pub const LEVEL_SEPARATOR: char = ':';

/// Aggregated measurements for one (subject, vertebral level) pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LevelAggregate {
    /// Summed size in voxels
    pub size: f64,
    map_weighted: f64,
    std_weighted: f64,
}

impl LevelAggregate {
    fn add(&mut self, size: Option<f64>, map: Option<f64>, std: Option<f64>) {
        let Some(size) = size else {
            return;
        };
        self.size += size;
        if let Some(map) = map {
            self.map_weighted += size * map;
        }
        if let Some(std) = std {
            self.std_weighted += size * std;
        }
    }

    /// Size-weighted mean of `MAP()`, `None` when the total size is zero
    pub fn map(&self) -> Option<f64> {
        self.weighted(self.map_weighted)
    }

    /// Size-weighted mean of `STD()`, `None` when the total size is zero
    pub fn std(&self) -> Option<f64> {
        self.weighted(self.std_weighted)
    }

    fn weighted(&self, sum: f64) -> Option<f64> {
        if self.size == 0.0 {
            None
        } else {
            Some(sum / self.size)
        }
    }
}

/// Collapses per-slice metric rows into one row per subject and vertebral level
///
/// The subject comes from the `Filename` column (`sub-<label>`); rows without
/// one are dropped. A `VertLevel` cell listing several levels (`2:3`) counts
/// the whole row towards each listed level. Sizes are summed and `MAP()` /
/// `STD()` are averaged with the size as weight. Output rows are ordered by
/// subject, then level.
///
/// # Returns
///
/// Number of aggregated rows written
///
/// # Errors
///
/// Returns an error if a required column is missing or a level or number
/// cannot be parsed.
pub fn aggregate_levels<R: Read, W: Write>(input: R, output: W) -> Result<usize> {
    let groups = collect_levels(input)?;

    let mut writer = Writer::from_writer(output);
    writer.write_record(["subject", LEVEL_COLUMN, SIZE_COLUMN, MAP_COLUMN, STD_COLUMN])?;
    for ((subject, level), agg) in &groups {
        writer.write_record([
            subject.clone(),
            level.to_string(),
            format_float(agg.size),
            format_optional(agg.map()),
            format_optional(agg.std()),
        ])?;
    }
    writer.flush()?;

    Ok(groups.len())
}

/// Reads the table and accumulates per (subject, level)
pub fn collect_levels<R: Read>(input: R) -> Result<BTreeMap<(String, i64), LevelAggregate>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(input);
    let headers = reader.headers()?.clone();
    let filename_idx = column_index(&headers, FILENAME_COLUMN)?;
    let level_idx = column_index(&headers, LEVEL_COLUMN)?;
    let size_idx = column_index(&headers, SIZE_COLUMN)?;
    let map_idx = column_index(&headers, MAP_COLUMN)?;
    let std_idx = column_index(&headers, STD_COLUMN)?;

    let mut groups: BTreeMap<(String, i64), LevelAggregate> = BTreeMap::new();
    for (line_num, result) in reader.records().enumerate() {
        let record = result?;
        let line = line_num + 2;

        let filename = record.get(filename_idx).unwrap_or("");
        let Some(subject) = extract_subject_token(filename) else {
            debug!("Line {}: no subject in '{}', dropped", line, filename);
            continue;
        };

        let size = parse_number(record.get(size_idx), SIZE_COLUMN, line)?;
        let map = parse_number(record.get(map_idx), MAP_COLUMN, line)?;
        let std = parse_number(record.get(std_idx), STD_COLUMN, line)?;

        for level in parse_levels(record.get(level_idx).unwrap_or(""), line)? {
            groups
                .entry((subject.to_string(), level))
                .or_default()
                .add(size, map, std);
        }
    }

    Ok(groups)
}

/// Splits a `VertLevel` cell into integer levels
fn parse_levels(cell: &str, line: usize) -> Result<Vec<i64>> {
    cell.split(LEVEL_SEPARATOR)
        .map(|part| {
            part.trim().parse::<i64>().map_err(|_| {
                BidsError::InvalidValue(format!(
                    "line {}: {} '{}' is not an integer level",
                    line, LEVEL_COLUMN, cell
                ))
            })
        })
        .collect()
}

/// Parses a numeric cell; empty and `nan` cells are missing values
fn parse_number(cell: Option<&str>, column: &str, line: usize) -> Result<Option<f64>> {
    let cell = cell.unwrap_or("").trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    cell.parse::<f64>().map(Some).map_err(|_| {
        BidsError::InvalidValue(format!("line {}: {} '{}' is not a number", line, column, cell))
    })
}

/// Formats a float the way the metric tables write them (`400.0`, `0.65`)
fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

fn format_optional(value: Option<f64>) -> String {
    value.map(format_float).unwrap_or_default()
}
