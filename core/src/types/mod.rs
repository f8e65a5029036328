//! Core type definitions for BIDS conversion
//!
//! This module provides the fundamental types used throughout the bidsify library:
//! - [`SubjectId`]: Canonical `sub-<label>` identifier
//! - [`Modality`]: Acquisition modalities recognised by the classifier
//! - [`Subfolder`]: Modality family folder (`anat`, `dwi`)
//! - [`ScanClassification`]: Modality plus optional chunk index
//! - [`ChunkCounter`]: Per-subject diffusion sequence counter
//! - [`ConversionConfig`]: Input/output roots and run options

mod classification;
mod config;
mod enums;
mod subject;

pub use classification::{ChunkCounter, ScanClassification};
pub use config::{ConversionConfig, DEFAULT_COMPRESSION_LEVEL, MAX_COMPRESSION_LEVEL};
pub use enums::{Modality, Subfolder, TraversalOrder};
pub use subject::SubjectId;
