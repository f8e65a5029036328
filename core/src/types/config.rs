use super::TraversalOrder;
use std::path::{Path, PathBuf};

/// Default gzip level for compressed NIfTI output
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Highest gzip compression level
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Configuration for a conversion run
///
/// # Example
///
/// ```
/// use bidsify_core::{ConversionConfig, TraversalOrder};
///
/// let config = ConversionConfig::new("/data/raw", "/data/bids")
///     .with_traversal(TraversalOrder::Filesystem)
///     .with_compression_level(12);
///
/// assert_eq!(config.traversal, TraversalOrder::Filesystem);
/// assert_eq!(config.compression_level, 9);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct ConversionConfig {
    /// Root holding one directory per raw acquisition
    pub input_root: PathBuf,

    /// Root of the BIDS output tree
    pub output_root: PathBuf,

    /// Directory visiting order, which determines diffusion chunk numbering
    pub traversal: TraversalOrder,

    /// Gzip level used for primary files (0-9)
    pub compression_level: u32,
}

impl ConversionConfig {
    /// Creates a config with default traversal and compression
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            traversal: TraversalOrder::default(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    /// Builder: Set traversal order
    pub fn with_traversal(mut self, traversal: TraversalOrder) -> Self {
        self.traversal = traversal;
        self
    }

    /// Builder: Set compression level, clamped to 0-9
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(MAX_COMPRESSION_LEVEL);
        self
    }

    /// Returns the input root
    pub fn input_root(&self) -> &Path {
        &self.input_root
    }

    /// Returns the output root
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }
}
