use super::{column_index, FILENAME_COLUMN, SUBJECT_COLUMN};
use crate::error::Result;
use csv::{ReaderBuilder, StringRecord, Writer};
use regex::Regex;
use std::io::{Read, Write};
use std::sync::OnceLock;

/// Finds the first `sub-<label>` token in a path or filename
///
/// The label runs up to the next `_` or `/`.
///
/// # Example
///
/// ```
/// use bidsify_core::tabular::extract_subject_token;
///
/// let path = "/bids/derivatives/sub-LC164/anat/sub-LC164_T2_seg.nii.gz";
/// assert_eq!(extract_subject_token(path), Some("sub-LC164"));
/// assert_eq!(extract_subject_token("template.nii.gz"), None);
/// ```
pub fn extract_subject_token(text: &str) -> Option<&str> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| Regex::new(r"sub-[^_/]+").expect("Failed to compile regex"));
    re.find(text).map(|m| m.as_str())
}

/// Copies a CSV table, prepending a `Subject` column derived from `Filename`
///
/// Rows without a subject token get an empty cell. An existing `Subject`
/// column is replaced.
///
/// # Returns
///
/// Number of data rows written
pub fn add_subject_column<R: Read, W: Write>(input: R, output: W) -> Result<usize> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(input);
    let headers = reader.headers()?.clone();
    let filename_idx = column_index(&headers, FILENAME_COLUMN)?;
    let kept: Vec<usize> = (0..headers.len())
        .filter(|&i| &headers[i] != SUBJECT_COLUMN)
        .collect();

    let mut writer = Writer::from_writer(output);
    let mut header_row = StringRecord::from(vec![SUBJECT_COLUMN]);
    header_row.extend(kept.iter().map(|&i| &headers[i]));
    writer.write_record(&header_row)?;

    let mut rows = 0;
    for result in reader.records() {
        let record = result?;
        let subject = record
            .get(filename_idx)
            .and_then(extract_subject_token)
            .unwrap_or("");

        let mut row = StringRecord::from(vec![subject]);
        row.extend(kept.iter().map(|&i| record.get(i).unwrap_or("")));
        writer.write_record(&row)?;
        rows += 1;
    }

    writer.flush()?;
    Ok(rows)
}
