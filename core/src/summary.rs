use crate::transfer::AssociatedFailure;
use crate::types::{ScanClassification, SubjectId};
use std::collections::HashSet;
use std::path::PathBuf;

/// Per-file result of a conversion run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(tag = "status", rename_all = "snake_case"))]
pub enum FileStatus {
    /// Primary and all associated files written
    Converted {
        destination: PathBuf,
        associated: usize,
    },

    /// Primary written but some associated files failed to copy
    Partial {
        destination: PathBuf,
        failed: Vec<AssociatedFailure>,
    },

    /// No classification rule matched; nothing written
    Unrecognized,

    /// Primary could not be written
    Failed { error: String },
}

/// Result for one primary data file
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct FileReport {
    pub source: PathBuf,
    pub classification: Option<ScanClassification>,
    pub status: FileStatus,
}

/// Result for one raw acquisition directory
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(tag = "outcome", rename_all = "snake_case"))]
pub enum SubjectOutcome {
    /// Subject id could not be derived; the directory was not walked
    Skipped { reason: String },

    /// Directory walked; individual files may still have failed
    Converted {
        subject: SubjectId,
        files: Vec<FileReport>,
    },
}

/// Result for one raw acquisition directory, with its source path
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct SubjectReport {
    pub source_dir: PathBuf,
    pub outcome: SubjectOutcome,
}

impl SubjectReport {
    /// Returns the subject id, if the directory was recognised
    pub fn subject(&self) -> Option<&SubjectId> {
        match &self.outcome {
            SubjectOutcome::Converted { subject, .. } => Some(subject),
            SubjectOutcome::Skipped { .. } => None,
        }
    }

    /// Returns the file reports (empty for skipped directories)
    pub fn files(&self) -> &[FileReport] {
        match &self.outcome {
            SubjectOutcome::Converted { files, .. } => files.as_slice(),
            SubjectOutcome::Skipped { .. } => &[],
        }
    }
}

/// Summary of a whole conversion run
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ConversionSummary {
    pub subjects: Vec<SubjectReport>,
}

impl ConversionSummary {
    fn count_files(&self, predicate: impl Fn(&FileStatus) -> bool) -> usize {
        self.subjects
            .iter()
            .flat_map(|s| s.files())
            .filter(|f| predicate(&f.status))
            .count()
    }

    /// Number of fully converted files
    pub fn converted(&self) -> usize {
        self.count_files(|s| matches!(s, FileStatus::Converted { .. }))
    }

    /// Number of files whose group was only partially written
    pub fn partial(&self) -> usize {
        self.count_files(|s| matches!(s, FileStatus::Partial { .. }))
    }

    /// Number of files matching no classification rule
    pub fn unrecognized(&self) -> usize {
        self.count_files(|s| matches!(s, FileStatus::Unrecognized))
    }

    /// Number of files that could not be written
    pub fn failed(&self) -> usize {
        self.count_files(|s| matches!(s, FileStatus::Failed { .. }))
    }

    /// Number of directories skipped for an unrecognised name
    pub fn skipped_subjects(&self) -> usize {
        self.subjects
            .iter()
            .filter(|s| matches!(s.outcome, SubjectOutcome::Skipped { .. }))
            .count()
    }

    /// Subjects produced by more than one acquisition directory
    ///
    /// Each repeated subject is listed once, in order of first repetition.
    /// Later directories overwrite the output of earlier ones.
    pub fn repeated_subjects(&self) -> Vec<&SubjectId> {
        let mut seen = HashSet::new();
        let mut repeated = Vec::new();
        for subject in self.subjects.iter().filter_map(SubjectReport::subject) {
            if !seen.insert(subject) && !repeated.contains(&subject) {
                repeated.push(subject);
            }
        }
        repeated
    }

    /// Whether no file failed or was partially written
    pub fn is_clean(&self) -> bool {
        self.failed() == 0 && self.partial() == 0
    }
}
