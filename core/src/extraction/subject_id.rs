use crate::error::{BidsError, Result};
use crate::types::SubjectId;
use regex::Regex;
use std::sync::OnceLock;

/// Marker identifying healthy-control acquisitions
pub const CONTROL_MARKER: &str = "DEV2";

/// Study marker preceding patient initials and number
pub const STUDY_MARKER: &str = "ICEBERG";

/// Marker preceding the participant number of healthy controls
pub const PARTICIPANT_MARKER: &str = "Sujet";

/// Extracts the BIDS subject id from a raw acquisition directory name
///
/// Two grammars are supported, selected by the presence of [`CONTROL_MARKER`]:
///
/// - Healthy control: `..._DEV2_<code>_..._Sujet<n>` → `sub-DEV<code>Sujet<n>`
/// - Patient: `..._ICEBERG_<initials>_<number>_...` → `sub-<initials><number>`
///
/// # Example
///
/// ```
/// use bidsify_core::extraction::extract_subject_id;
///
/// let control = extract_subject_id("2023_10_02_DEV2_206_01_ICEBERG_ME_Sujet10").unwrap();
/// assert_eq!(control.as_str(), "sub-DEV206Sujet10");
///
/// let patient = extract_subject_id("2020_09_16_ICEBERG_LM_166_V3_M").unwrap();
/// assert_eq!(patient.as_str(), "sub-LM166");
/// ```
///
/// # Errors
///
/// Returns [`BidsError::UnrecognizedSubjectPattern`] if the selected grammar
/// does not match the name.
pub fn extract_subject_id(dirname: &str) -> Result<SubjectId> {
    let label = if dirname.contains(CONTROL_MARKER) {
        control_label(dirname)
    } else {
        patient_label(dirname)
    };

    label
        .and_then(|l| SubjectId::from_label(&l))
        .ok_or_else(|| BidsError::UnrecognizedSubjectPattern(dirname.to_string()))
}

/// Healthy-control label: `DEV<code>Sujet<participant>`
fn control_label(dirname: &str) -> Option<String> {
    static CODE: OnceLock<Regex> = OnceLock::new();
    static PARTICIPANT: OnceLock<Regex> = OnceLock::new();
    let code_re = CODE.get_or_init(|| {
        Regex::new(&format!(r"{}_(\d+)(?:_|$)", CONTROL_MARKER))
            .expect("Failed to compile regex")
    });
    let participant_re = PARTICIPANT.get_or_init(|| {
        Regex::new(&format!(r"{}(\d+)", PARTICIPANT_MARKER)).expect("Failed to compile regex")
    });

    let code = code_re.captures(dirname)?.get(1)?.as_str();
    let participant = participant_re.captures(dirname)?.get(1)?.as_str();
    Some(format!("DEV{}{}{}", code, PARTICIPANT_MARKER, participant))
}

/// Patient label: `<initials><number>`
fn patient_label(dirname: &str) -> Option<String> {
    static PATIENT: OnceLock<Regex> = OnceLock::new();
    let re = PATIENT.get_or_init(|| {
        Regex::new(&format!(r"{}_([A-Za-z]{{1,3}})_(\d+)(?:_|$)", STUDY_MARKER))
            .expect("Failed to compile regex")
    });

    let caps = re.captures(dirname)?;
    Some(format!("{}{}", caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}
