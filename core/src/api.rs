use crate::error::{BidsError, Result};
use crate::extraction::{classify_with_counter, extract_subject_id, matching_rules};
use crate::layout::{OutputLayout, SOURCE_EXTENSION};
use crate::summary::{ConversionSummary, FileReport, FileStatus, SubjectOutcome, SubjectReport};
use crate::transfer::{AcquisitionGroup, FileTransfer};
use crate::types::{ChunkCounter, ConversionConfig, SubjectId, TraversalOrder};
use log::{debug, error, info, warn};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Converter from a raw ICEBERG acquisition tree to a BIDS layout
///
/// Walks every acquisition directory under the input root, derives the
/// subject id from the directory name, classifies each `.nii` file and
/// writes it (compressed) with its sidecar and diffusion companions into
/// `<output_root>/<subject>/<anat|dwi>/`.
///
/// Failures are reported per directory and per file; they never stop the run.
///
/// # Example
///
/// ```no_run
/// use bidsify_core::{BidsConverter, ConversionConfig};
///
/// let converter = BidsConverter::new(ConversionConfig::new("/data/raw", "/data/bids"));
/// let summary = converter.run().unwrap();
/// println!("{} files converted", summary.converted());
/// ```
pub struct BidsConverter {
    config: ConversionConfig,
    layout: OutputLayout,
    transfer: FileTransfer,
}

impl BidsConverter {
    /// Creates a converter for the given configuration
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            layout: OutputLayout::new(&config.output_root),
            transfer: FileTransfer::new(config.compression_level),
            config,
        }
    }

    /// Converts every acquisition directory under the input root
    ///
    /// Two directories mapping to the same subject (e.g. two visits) write to
    /// the same output files; the later one wins and a warning is logged.
    ///
    /// # Errors
    ///
    /// Returns an error only if the input root is not a readable directory.
    pub fn run(&self) -> Result<ConversionSummary> {
        let mut seen = HashSet::new();
        let mut subjects = Vec::new();

        for dir in self.acquisition_dirs()? {
            let report = self.convert_subject(&dir);
            if let Some(subject) = report.subject() {
                if !seen.insert(subject.clone()) {
                    warn!(
                        "{} maps to {} again, earlier output for it was overwritten",
                        dir.display(),
                        subject
                    );
                }
            }
            subjects.push(report);
        }

        Ok(ConversionSummary { subjects })
    }

    /// Converts one raw acquisition directory
    ///
    /// The diffusion chunk counter starts at 1 for every directory.
    pub fn convert_subject(&self, dir: &Path) -> SubjectReport {
        let dirname = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let outcome = match extract_subject_id(&dirname) {
            Ok(subject) => {
                info!("{} -> {}", dirname, subject);
                let files = self.convert_files(dir, &subject);
                SubjectOutcome::Converted { subject, files }
            }
            Err(e) => {
                warn!("Skipping {}: {}", dir.display(), e);
                SubjectOutcome::Skipped {
                    reason: e.to_string(),
                }
            }
        };

        SubjectReport {
            source_dir: dir.to_path_buf(),
            outcome,
        }
    }

    /// Lists the acquisition directories directly under the input root
    fn acquisition_dirs(&self) -> Result<Vec<PathBuf>> {
        let root = self.config.input_root();
        if !root.is_dir() {
            return Err(BidsError::NotADirectory(root.to_path_buf()));
        }

        let mut dirs = Vec::new();
        for entry in fs::read_dir(root).map_err(|e| BidsError::io(root, e))? {
            let path = entry.map_err(|e| BidsError::io(root, e))?.path();
            if path.is_dir() {
                dirs.push(path);
            } else {
                debug!("Ignoring non-directory {}", path.display());
            }
        }

        if self.config.traversal == TraversalOrder::Sorted {
            dirs.sort();
        }

        Ok(dirs)
    }

    /// Walks one subject tree, classifying and transferring each primary file
    ///
    /// Within every directory, files are visited before subdirectories.
    fn convert_files(&self, dir: &Path, subject: &SubjectId) -> Vec<FileReport> {
        let walker = WalkDir::new(dir).min_depth(1);
        let walker = match self.config.traversal {
            TraversalOrder::Sorted => walker.sort_by(|a, b| {
                files_first(a, b).then_with(|| a.file_name().cmp(b.file_name()))
            }),
            // Stable sort: listing order is kept within files and within dirs
            TraversalOrder::Filesystem => walker.sort_by(files_first),
        };

        let mut counter = ChunkCounter::new();
        let mut reports = Vec::new();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    error!("❌ {}", e);
                    reports.push(FileReport {
                        source: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
                        classification: None,
                        status: FileStatus::Failed {
                            error: e.to_string(),
                        },
                    });
                    continue;
                }
            };

            if !is_primary_file(entry.path()) {
                continue;
            }

            let (report, next) = self.convert_file(entry.path(), subject, counter);
            counter = next;
            reports.push(report);
        }

        reports
    }

    /// Classifies and transfers a single primary file
    ///
    /// Takes the subject's chunk counter and returns it, advanced if the file
    /// was classified as diffusion. The counter advances even when the
    /// transfer itself fails.
    fn convert_file(
        &self,
        path: &Path,
        subject: &SubjectId,
        counter: ChunkCounter,
    ) -> (FileReport, ChunkCounter) {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let rules = matching_rules(&filename);
        if rules.len() > 1 {
            warn!(
                "{} matches {} classification rules, using '{}'",
                filename,
                rules.len(),
                rules[0].pattern
            );
        }

        let (classification, counter) = classify_with_counter(&filename, counter);
        let Some(classification) = classification else {
            warn!("❌ {}", filename);
            let report = FileReport {
                source: path.to_path_buf(),
                classification: None,
                status: FileStatus::Unrecognized,
            };
            return (report, counter);
        };

        let dest = self.layout.destination(subject, &classification);
        let group =
            AcquisitionGroup::discover(path, classification.modality.has_auxiliary_files());

        let status = match self.transfer.transfer(&group, &dest) {
            Ok(outcome) if outcome.is_complete() => FileStatus::Converted {
                destination: outcome.primary,
                associated: outcome.copied.len(),
            },
            Ok(outcome) => {
                for failure in &outcome.failed {
                    error!(
                        "❌ {} (companion of {}): {}",
                        failure.source.display(),
                        outcome.primary.display(),
                        failure.error
                    );
                }
                FileStatus::Partial {
                    destination: outcome.primary,
                    failed: outcome.failed,
                }
            }
            Err(e) => {
                error!("❌ {}: {}", path.display(), e);
                FileStatus::Failed {
                    error: e.to_string(),
                }
            }
        };

        let report = FileReport {
            source: path.to_path_buf(),
            classification: Some(classification),
            status,
        };
        (report, counter)
    }
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type().is_dir().cmp(&b.file_type().is_dir())
}

/// Whether `path` is a raw (uncompressed) primary data file
fn is_primary_file(path: &Path) -> bool {
    path.is_file() && path.extension() == Some(OsStr::new(SOURCE_EXTENSION))
}
