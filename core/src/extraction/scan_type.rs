use crate::types::{ChunkCounter, Modality, ScanClassification};

/// One classification rule: a filename substring and the modality it implies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRule {
    pub pattern: &'static str,
    pub modality: Modality,
}

/// Classification rules, evaluated in order; the first match wins
///
/// `T1_SAG_MT_FL3D` must stay ahead of `T1_SAG_FL3D`. The rules are plain
/// substring tests and are not mutually exclusive, see [`matching_rules`].
pub const SCAN_RULES: &[ScanRule] = &[
    ScanRule {
        pattern: "T2_SAG",
        modality: Modality::T2,
    },
    ScanRule {
        pattern: "DTI_64DIR",
        modality: Modality::Dwi,
    },
    ScanRule {
        pattern: "T1_SAG_MT_FL3D",
        modality: Modality::MtOn,
    },
    ScanRule {
        pattern: "T1_SAG_FL3D",
        modality: Modality::MtOff,
    },
    ScanRule {
        pattern: "mp2rage_sag_p3_1mm_iso_T1",
        modality: Modality::T1Map,
    },
    ScanRule {
        pattern: "mp2rage_sag_p3_1mm_iso_UNI",
        modality: Modality::Unit1,
    },
];

/// Returns the modality of the first rule matching `filename`
///
/// # Example
///
/// ```
/// use bidsify_core::extraction::classify_scan;
/// use bidsify_core::Modality;
///
/// assert_eq!(classify_scan("s003_T2_SAG_TSE.nii"), Some(Modality::T2));
/// assert_eq!(classify_scan("localizer.nii"), None);
/// ```
pub fn classify_scan(filename: &str) -> Option<Modality> {
    SCAN_RULES
        .iter()
        .find(|rule| filename.contains(rule.pattern))
        .map(|rule| rule.modality)
}

/// Returns every rule matching `filename`, in evaluation order
///
/// More than one entry means the name is ambiguous and only the first rule
/// is applied.
pub fn matching_rules(filename: &str) -> Vec<&'static ScanRule> {
    SCAN_RULES
        .iter()
        .filter(|rule| filename.contains(rule.pattern))
        .collect()
}

/// Classifies `filename` and assigns a chunk index to multi-part modalities
///
/// The counter is taken by value and handed back: a diffusion file receives
/// the counter's current value and the returned counter is advanced; any
/// other outcome returns the counter unchanged.
///
/// # Example
///
/// ```
/// use bidsify_core::extraction::classify_with_counter;
/// use bidsify_core::ChunkCounter;
///
/// let counter = ChunkCounter::new();
/// let (first, counter) = classify_with_counter("DTI_64DIR_AP.nii", counter);
/// let (_, counter) = classify_with_counter("T2_SAG.nii", counter);
/// let (second, _) = classify_with_counter("DTI_64DIR_PA.nii", counter);
///
/// assert_eq!(first.unwrap().token(), "chunk-1_DWI");
/// assert_eq!(second.unwrap().token(), "chunk-2_DWI");
/// ```
pub fn classify_with_counter(
    filename: &str,
    counter: ChunkCounter,
) -> (Option<ScanClassification>, ChunkCounter) {
    match classify_scan(filename) {
        Some(modality) if modality.is_multi_part() => {
            let (chunk, counter) = counter.advance();
            (Some(ScanClassification::chunked(modality, chunk)), counter)
        }
        Some(modality) => (Some(ScanClassification::single(modality)), counter),
        None => (None, counter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("s004_T2_SAG_TSE_p2.nii", Modality::T2)]
    #[case("s010_DTI_64DIR_AP.nii", Modality::Dwi)]
    #[case("s005_T1_SAG_MT_FL3D.nii", Modality::MtOn)]
    #[case("s006_T1_SAG_FL3D.nii", Modality::MtOff)]
    #[case("s007_mp2rage_sag_p3_1mm_iso_T1_Images.nii", Modality::T1Map)]
    #[case("s008_mp2rage_sag_p3_1mm_iso_UNI_Images.nii", Modality::Unit1)]
    fn test_classify_each_rule(#[case] filename: &str, #[case] expected: Modality) {
        assert_eq!(classify_scan(filename), Some(expected));
    }

    #[rstest]
    #[case("s001_localizer.nii")]
    #[case("s002_t2_sag.nii")]
    #[case("mp2rage_sag_p3_1mm_iso_INV1.nii")]
    #[case("")]
    fn test_unrecognized(#[case] filename: &str) {
        assert_eq!(classify_scan(filename), None);
        assert!(matching_rules(filename).is_empty());
    }

    #[test]
    fn test_mt_on_not_shadowed_by_mt_off() {
        assert_eq!(matching_rules("T1_SAG_MT_FL3D.nii").len(), 1);
        assert_eq!(classify_scan("T1_SAG_MT_FL3D.nii"), Some(Modality::MtOn));
    }

    #[test]
    fn test_first_rule_wins_on_overlap() {
        let name = "T2_SAG_then_DTI_64DIR.nii";
        let rules = matching_rules(name);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].modality, Modality::T2);
        assert_eq!(classify_scan(name), Some(Modality::T2));
    }

    #[test]
    fn test_counter_ignores_other_modalities() {
        let counter = ChunkCounter::new();
        let (t2, counter) = classify_with_counter("T2_SAG.nii", counter);
        assert_eq!(t2, Some(ScanClassification::single(Modality::T2)));
        assert_eq!(counter.peek(), 1);

        let (none, counter) = classify_with_counter("localizer.nii", counter);
        assert!(none.is_none());
        assert_eq!(counter.peek(), 1);
    }

    #[test]
    fn test_counter_monotonic_for_diffusion() {
        let mut counter = ChunkCounter::new();
        let names = [
            "DTI_64DIR_1.nii",
            "T1_SAG_FL3D.nii",
            "DTI_64DIR_2.nii",
            "mp2rage_sag_p3_1mm_iso_UNI.nii",
            "DTI_64DIR_3.nii",
        ];
        let mut chunks = Vec::new();
        for name in names {
            let (classification, next) = classify_with_counter(name, counter);
            counter = next;
            if let Some(chunk) = classification.and_then(|c| c.chunk) {
                chunks.push(chunk);
            }
        }
        assert_eq!(chunks, vec![1, 2, 3]);
    }
}
