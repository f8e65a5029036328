use std::fmt;

/// Acquisition modality recognised by the scan classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum Modality {
    /// Sagittal T2-weighted
    T2,
    /// 64-direction diffusion, acquired in chunks
    Dwi,
    /// Magnetization transfer, MT pulse on
    MtOn,
    /// Magnetization transfer, MT pulse off
    MtOff,
    /// MP2RAGE T1 map
    T1Map,
    /// MP2RAGE uniform image
    Unit1,
}

impl Modality {
    /// Returns the BIDS suffix (with entities) used in the output filename
    ///
    /// Diffusion scans additionally carry a `chunk-N_` entity, which is added
    /// by [`crate::ScanClassification::token`].
    pub fn suffix(&self) -> &'static str {
        match self {
            Modality::T2 => "T2",
            Modality::Dwi => "DWI",
            Modality::MtOn => "mt-on_MTS",
            Modality::MtOff => "mt-off_MTS",
            Modality::T1Map => "T1map",
            Modality::Unit1 => "UNIT1",
        }
    }

    /// Returns the output subfolder for this modality
    pub fn subfolder(&self) -> Subfolder {
        match self {
            Modality::Dwi => Subfolder::Dwi,
            _ => Subfolder::Anat,
        }
    }

    /// Whether files of this modality are numbered with a per-subject chunk index
    pub fn is_multi_part(&self) -> bool {
        matches!(self, Modality::Dwi)
    }

    /// Whether files of this modality come with `.bval`/`.bvec` companions
    pub fn has_auxiliary_files(&self) -> bool {
        matches!(self, Modality::Dwi)
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

/// Modality family folder inside a subject directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum Subfolder {
    /// Anatomical scans
    Anat,
    /// Diffusion scans
    Dwi,
}

impl Subfolder {
    /// Returns the directory name
    pub fn dir_name(&self) -> &'static str {
        match self {
            Subfolder::Anat => "anat",
            Subfolder::Dwi => "dwi",
        }
    }
}

impl fmt::Display for Subfolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

/// Order in which directory entries are visited during conversion
///
/// Diffusion chunk numbers follow visiting order, so this decides which
/// acquisition becomes `chunk-1`. In both orders a directory's files come
/// before any of its subdirectories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum TraversalOrder {
    /// Entries sorted by file name at every level (reproducible)
    #[default]
    Sorted,

    /// Files, then subdirectories, each in the order the filesystem lists them
    Filesystem,
}
