//! Name-based extraction of subject ids and scan types

pub mod scan_type;
pub mod subject_id;

pub use scan_type::{classify_scan, classify_with_counter, matching_rules, ScanRule, SCAN_RULES};
pub use subject_id::extract_subject_id;
