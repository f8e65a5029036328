use crate::summary::{ConversionSummary, FileStatus, SubjectOutcome};
use std::fmt;

/// Text report formatter for a conversion run
pub struct TextReport<'a> {
    summary: &'a ConversionSummary,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(summary: &'a ConversionSummary) -> Self {
        Self { summary }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for subject in &self.summary.subjects {
            let dirname = subject
                .source_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            match &subject.outcome {
                SubjectOutcome::Skipped { reason } => {
                    writeln!(f, "{} -> skipped ({})", dirname, reason)?;
                    writeln!(f)?;
                    continue;
                }
                SubjectOutcome::Converted { subject, files } => {
                    writeln!(f, "{} -> {}", dirname, subject)?;
                    writeln!(f, "{}", "=".repeat(76))?;
                    for file in files {
                        let name = file
                            .source
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_else(|| file.source.display().to_string());
                        match &file.status {
                            FileStatus::Converted { destination, .. } => {
                                writeln!(f, "✅ {} -> {}", name, destination.display())?
                            }
                            FileStatus::Partial {
                                destination,
                                failed,
                            } => {
                                writeln!(
                                    f,
                                    "⚠️  {} -> {} ({} companion file(s) missing)",
                                    name,
                                    destination.display(),
                                    failed.len()
                                )?;
                                for failure in failed {
                                    writeln!(
                                        f,
                                        "     {}: {}",
                                        failure.source.display(),
                                        failure.error
                                    )?;
                                }
                            }
                            FileStatus::Unrecognized => writeln!(f, "❌ {}", name)?,
                            FileStatus::Failed { error } => {
                                writeln!(f, "❌ {} ({})", name, error)?
                            }
                        }
                    }
                    writeln!(f)?;
                }
            }
        }

        writeln!(f, "Summary")?;
        writeln!(f, "-------")?;
        writeln!(f, "Subjects:       {}", self.summary.subjects.len())?;
        writeln!(f, "Skipped dirs:   {}", self.summary.skipped_subjects())?;
        writeln!(f, "Converted:      {}", self.summary.converted())?;
        writeln!(f, "Partial:        {}", self.summary.partial())?;
        writeln!(f, "Unrecognized:   {}", self.summary.unrecognized())?;
        writeln!(f, "Failed:         {}", self.summary.failed())?;

        for subject in self.summary.repeated_subjects() {
            writeln!(f, "⚠️  {} converted from several directories, last one kept", subject)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{FileReport, SubjectReport};
    use crate::transfer::AssociatedFailure;
    use crate::types::{Modality, ScanClassification, SubjectId};
    use std::path::PathBuf;

    #[test]
    fn test_text_report_format() {
        let summary = ConversionSummary {
            subjects: vec![
                SubjectReport {
                    source_dir: PathBuf::from("raw/2020_10_28_ICEBERG_LC_164_V3_M"),
                    outcome: SubjectOutcome::Converted {
                        subject: SubjectId::from_label("LC164").unwrap(),
                        files: vec![
                            FileReport {
                                source: PathBuf::from("raw/x/s03_T2_SAG.nii"),
                                classification: Some(ScanClassification::single(Modality::T2)),
                                status: FileStatus::Converted {
                                    destination: PathBuf::from("bids/sub-LC164/anat/sub-LC164_T2.nii.gz"),
                                    associated: 1,
                                },
                            },
                            FileReport {
                                source: PathBuf::from("raw/x/s10_DTI_64DIR.nii"),
                                classification: Some(ScanClassification::chunked(Modality::Dwi, 1)),
                                status: FileStatus::Partial {
                                    destination: PathBuf::from(
                                        "bids/sub-LC164/dwi/sub-LC164_chunk-1_DWI.nii.gz",
                                    ),
                                    failed: vec![AssociatedFailure {
                                        source: PathBuf::from("raw/x/s10_DTI_64DIR.bvec"),
                                        error: "permission denied".to_string(),
                                    }],
                                },
                            },
                            FileReport {
                                source: PathBuf::from("raw/x/s01_localizer.nii"),
                                classification: None,
                                status: FileStatus::Unrecognized,
                            },
                        ],
                    },
                },
                SubjectReport {
                    source_dir: PathBuf::from("raw/phantom"),
                    outcome: SubjectOutcome::Skipped {
                        reason: "Cannot determine subject id from directory name: phantom"
                            .to_string(),
                    },
                },
            ],
        };

        let output = format!("{}", TextReport::new(&summary));

        assert!(output.contains("2020_10_28_ICEBERG_LC_164_V3_M -> sub-LC164"));
        assert!(output.contains("✅ s03_T2_SAG.nii -> bids/sub-LC164/anat/sub-LC164_T2.nii.gz"));
        assert!(output.contains("(1 companion file(s) missing)"));
        assert!(output.contains("permission denied"));
        assert!(output.contains("❌ s01_localizer.nii"));
        assert!(output.contains("phantom -> skipped"));
        assert!(output.contains("Converted:      1"));
        assert!(output.contains("Partial:        1"));
        assert!(output.contains("Unrecognized:   1"));
        assert!(output.contains("Skipped dirs:   1"));
    }
}
