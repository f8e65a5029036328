//! Physical transfer of an acquisition group into the output tree
//!
//! The primary file is gzip-compressed into place; the sidecar and, for
//! diffusion scans, the `.bval`/`.bvec` files are copied verbatim under the
//! renamed base. Sources are never modified or removed and destinations are
//! overwritten, so a repeated transfer produces the same files.

use crate::error::{BidsError, Result};
use crate::layout::{Destination, AUXILIARY_EXTENSIONS, SIDECAR_EXTENSION};
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, info};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// A file travelling alongside the primary file
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct AssociatedFile {
    /// Extension kept on the destination (`json`, `bval`, `bvec`)
    pub extension: &'static str,

    /// Source path
    pub path: PathBuf,
}

/// Primary data file plus the associated files found next to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionGroup {
    pub primary: PathBuf,
    pub associated: Vec<AssociatedFile>,
}

impl AcquisitionGroup {
    /// Collects the existing companions of `primary`
    ///
    /// Companions share the primary's base name and directory. The sidecar
    /// is always looked for; auxiliary files only when `with_auxiliary` is
    /// set.
    pub fn discover(primary: &Path, with_auxiliary: bool) -> Self {
        let mut extensions = vec![SIDECAR_EXTENSION];
        if with_auxiliary {
            extensions.extend(AUXILIARY_EXTENSIONS);
        }

        let associated = extensions
            .into_iter()
            .map(|extension| AssociatedFile {
                extension,
                path: primary.with_extension(extension),
            })
            .filter(|file| file.path.is_file())
            .collect();

        Self {
            primary: primary.to_path_buf(),
            associated,
        }
    }
}

/// An associated file that could not be copied
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct AssociatedFailure {
    pub source: PathBuf,
    pub error: String,
}

/// What a transfer wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Compressed primary file
    pub primary: PathBuf,

    /// Associated files copied successfully (destination paths)
    pub copied: Vec<PathBuf>,

    /// Associated files that failed; the primary is left in place
    pub failed: Vec<AssociatedFailure>,
}

impl TransferOutcome {
    /// Whether every file of the group reached the destination
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Writes acquisition groups into the output tree
#[derive(Debug, Clone, Copy)]
pub struct FileTransfer {
    compression: Compression,
}

impl FileTransfer {
    /// Creates a transfer engine using the given gzip level (0-9)
    pub fn new(compression_level: u32) -> Self {
        Self {
            compression: Compression::new(compression_level),
        }
    }

    /// Transfers a group to `dest`
    ///
    /// # Errors
    ///
    /// Returns an error if the destination directory cannot be created or the
    /// primary file cannot be compressed. Failures on associated files do not
    /// fail the transfer; they are listed in [`TransferOutcome::failed`].
    pub fn transfer(&self, group: &AcquisitionGroup, dest: &Destination) -> Result<TransferOutcome> {
        fs::create_dir_all(&dest.dir).map_err(|e| BidsError::io(&dest.dir, e))?;

        let primary = dest.primary_path();
        let bytes = self.compress(&group.primary, &primary)?;
        info!("✅ {} -> {}", group.primary.display(), primary.display());
        debug!("Compressed {} bytes", bytes);

        let mut copied = Vec::new();
        let mut failed = Vec::new();
        for file in &group.associated {
            let target = dest.associated_path(file.extension);
            match copy_verbatim(&file.path, &target) {
                Ok(_) => {
                    debug!("Copied {} -> {}", file.path.display(), target.display());
                    copied.push(target);
                }
                Err(e) => failed.push(AssociatedFailure {
                    source: file.path.clone(),
                    error: e.to_string(),
                }),
            }
        }

        Ok(TransferOutcome {
            primary,
            copied,
            failed,
        })
    }

    /// Streams `src` through gzip into `dst`, returning the uncompressed size
    fn compress(&self, src: &Path, dst: &Path) -> Result<u64> {
        let input = File::open(src).map_err(|e| BidsError::io(src, e))?;
        let output = File::create(dst).map_err(|e| BidsError::io(dst, e))?;

        let mut reader = BufReader::new(input);
        let mut encoder = GzEncoder::new(BufWriter::new(output), self.compression);
        let bytes = io::copy(&mut reader, &mut encoder).map_err(|e| BidsError::io(src, e))?;
        encoder
            .finish()
            .and_then(|mut writer| writer.flush())
            .map_err(|e| BidsError::io(dst, e))?;

        Ok(bytes)
    }
}

impl Default for FileTransfer {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_COMPRESSION_LEVEL)
    }
}

fn copy_verbatim(src: &Path, dst: &Path) -> Result<u64> {
    fs::copy(src, dst).map_err(|e| BidsError::io(src, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn gunzip(path: &Path) -> Vec<u8> {
        let mut decoder = GzDecoder::new(File::open(path).unwrap());
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        out
    }

    fn destination(root: &Path, base: &str) -> Destination {
        Destination {
            dir: root.join("sub-LC164").join("dwi"),
            base: base.to_string(),
        }
    }

    #[test]
    fn test_discover_sidecar_only_without_auxiliary() {
        let temp_dir = TempDir::new().unwrap();
        let primary = temp_dir.path().join("T2_SAG.nii");
        write(&primary, b"nifti");
        write(&temp_dir.path().join("T2_SAG.json"), b"{}");
        write(&temp_dir.path().join("T2_SAG.bval"), b"0 1000");

        let group = AcquisitionGroup::discover(&primary, false);
        assert_eq!(group.associated.len(), 1);
        assert_eq!(group.associated[0].extension, "json");
    }

    #[test]
    fn test_discover_auxiliary_files() {
        let temp_dir = TempDir::new().unwrap();
        let primary = temp_dir.path().join("DTI_64DIR.nii");
        write(&primary, b"nifti");
        write(&temp_dir.path().join("DTI_64DIR.bval"), b"0 1000");
        write(&temp_dir.path().join("DTI_64DIR.bvec"), b"1 0 0");

        let group = AcquisitionGroup::discover(&primary, true);
        let extensions: Vec<_> = group.associated.iter().map(|f| f.extension).collect();
        assert_eq!(extensions, vec!["bval", "bvec"]);
    }

    #[test]
    fn test_transfer_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let primary = temp_dir.path().join("raw").join("DTI_64DIR.nii");
        let payload: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        write(&primary, &payload);
        write(&primary.with_extension("json"), b"{\"EchoTime\": 0.08}");
        write(&primary.with_extension("bval"), b"0 1000 1000");
        write(&primary.with_extension("bvec"), b"1 0 0\n0 1 0\n0 0 1");

        let group = AcquisitionGroup::discover(&primary, true);
        let dest = destination(&temp_dir.path().join("out"), "sub-LC164_chunk-1_DWI");
        let outcome = FileTransfer::default().transfer(&group, &dest).unwrap();

        assert!(outcome.is_complete());
        assert_eq!(outcome.copied.len(), 3);
        assert_eq!(gunzip(&outcome.primary), payload);
        assert_eq!(
            fs::read(dest.associated_path("json")).unwrap(),
            b"{\"EchoTime\": 0.08}"
        );
        assert_eq!(fs::read(dest.associated_path("bval")).unwrap(), b"0 1000 1000");

        // Source untouched
        assert_eq!(fs::read(&primary).unwrap(), payload);
    }

    #[test]
    fn test_transfer_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let primary = temp_dir.path().join("T2_SAG.nii");
        write(&primary, b"some image bytes");

        let group = AcquisitionGroup::discover(&primary, false);
        let dest = destination(&temp_dir.path().join("out"), "sub-LC164_T2");
        let engine = FileTransfer::new(9);

        engine.transfer(&group, &dest).unwrap();
        let first = fs::read(dest.primary_path()).unwrap();
        engine.transfer(&group, &dest).unwrap();
        let second = fs::read(dest.primary_path()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_primary_fails() {
        let temp_dir = TempDir::new().unwrap();
        let group = AcquisitionGroup {
            primary: temp_dir.path().join("absent.nii"),
            associated: Vec::new(),
        };
        let dest = destination(temp_dir.path(), "sub-LC164_T2");

        let err = FileTransfer::default().transfer(&group, &dest).unwrap_err();
        assert!(matches!(err, BidsError::Io { .. }));
    }

    #[test]
    fn test_failed_sidecar_keeps_primary() {
        let temp_dir = TempDir::new().unwrap();
        let primary = temp_dir.path().join("T2_SAG.nii");
        write(&primary, b"image");

        let group = AcquisitionGroup {
            primary: primary.clone(),
            associated: vec![AssociatedFile {
                extension: "json",
                path: temp_dir.path().join("vanished.json"),
            }],
        };
        let dest = destination(&temp_dir.path().join("out"), "sub-LC164_T2");
        let outcome = FileTransfer::default().transfer(&group, &dest).unwrap();

        assert!(!outcome.is_complete());
        assert_eq!(outcome.failed.len(), 1);
        assert!(outcome.primary.is_file());
        assert!(!dest.associated_path("json").exists());
    }
}
