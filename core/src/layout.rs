//! Canonical output paths
//!
//! Maps a subject id and scan classification onto
//! `<output_root>/<subject>/<subfolder>/<subject>_<token>.<ext>`.
//! Nothing here touches the filesystem.

use crate::types::{ScanClassification, SubjectId};
use std::path::PathBuf;

/// Extension of primary data files in the raw tree
pub const SOURCE_EXTENSION: &str = "nii";

/// Extension of primary data files in the output tree
pub const COMPRESSED_EXTENSION: &str = "nii.gz";

/// Extension of metadata sidecars
pub const SIDECAR_EXTENSION: &str = "json";

/// Extensions of diffusion companion files (b-values, b-vectors)
pub const AUXILIARY_EXTENSIONS: [&str; 2] = ["bval", "bvec"];

/// Output directory and renamed base for one acquisition
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Destination {
    /// `<output_root>/<subject>/<subfolder>`
    pub dir: PathBuf,

    /// `<subject>_<token>`, without extension
    pub base: String,
}

impl Destination {
    /// Filename of the compressed primary file
    pub fn file_name(&self) -> String {
        self.file_name_with(COMPRESSED_EXTENSION)
    }

    /// Filename for an associated file with the given extension
    pub fn file_name_with(&self, extension: &str) -> String {
        format!("{}.{}", self.base, extension)
    }

    /// Full path of the compressed primary file
    pub fn primary_path(&self) -> PathBuf {
        self.dir.join(self.file_name())
    }

    /// Full path of an associated file with the given extension
    pub fn associated_path(&self, extension: &str) -> PathBuf {
        self.dir.join(self.file_name_with(extension))
    }
}

/// Builder of canonical output locations rooted at one directory
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Creates a layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the directory holding everything for one subject
    pub fn subject_dir(&self, subject: &SubjectId) -> PathBuf {
        self.root.join(subject.as_str())
    }

    /// Builds the destination for a classified acquisition
    ///
    /// # Example
    ///
    /// ```
    /// use bidsify_core::extraction::extract_subject_id;
    /// use bidsify_core::layout::OutputLayout;
    /// use bidsify_core::{Modality, ScanClassification};
    /// use std::path::Path;
    ///
    /// let layout = OutputLayout::new("/bids");
    /// let subject = extract_subject_id("2020_10_28_ICEBERG_LC_164_V3_M").unwrap();
    /// let dest = layout.destination(&subject, &ScanClassification::chunked(Modality::Dwi, 1));
    ///
    /// assert_eq!(dest.dir, Path::new("/bids/sub-LC164/dwi"));
    /// assert_eq!(dest.file_name(), "sub-LC164_chunk-1_DWI.nii.gz");
    /// ```
    pub fn destination(
        &self,
        subject: &SubjectId,
        classification: &ScanClassification,
    ) -> Destination {
        Destination {
            dir: self
                .subject_dir(subject)
                .join(classification.subfolder().dir_name()),
            base: format!("{}_{}", subject, classification.token()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Modality;
    use std::path::Path;

    fn subject() -> SubjectId {
        SubjectId::from_label("LC164").unwrap()
    }

    #[test]
    fn test_anatomical_destination() {
        let layout = OutputLayout::new("out");
        let dest = layout.destination(&subject(), &ScanClassification::single(Modality::T2));

        assert_eq!(dest.dir, Path::new("out").join("sub-LC164").join("anat"));
        assert_eq!(dest.file_name(), "sub-LC164_T2.nii.gz");
        assert_eq!(
            dest.primary_path(),
            Path::new("out/sub-LC164/anat/sub-LC164_T2.nii.gz")
        );
    }

    #[test]
    fn test_associated_paths_share_base() {
        let layout = OutputLayout::new("out");
        let dest = layout.destination(&subject(), &ScanClassification::chunked(Modality::Dwi, 2));

        assert_eq!(dest.base, "sub-LC164_chunk-2_DWI");
        assert_eq!(
            dest.associated_path(SIDECAR_EXTENSION),
            Path::new("out/sub-LC164/dwi/sub-LC164_chunk-2_DWI.json")
        );
        assert_eq!(dest.file_name_with("bvec"), "sub-LC164_chunk-2_DWI.bvec");
    }

    #[test]
    fn test_mt_tokens() {
        let layout = OutputLayout::new("out");
        let on = layout.destination(&subject(), &ScanClassification::single(Modality::MtOn));
        let off = layout.destination(&subject(), &ScanClassification::single(Modality::MtOff));
        assert_eq!(on.file_name(), "sub-LC164_mt-on_MTS.nii.gz");
        assert_eq!(off.file_name(), "sub-LC164_mt-off_MTS.nii.gz");
    }
}
