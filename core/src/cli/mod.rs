pub mod report;

use crate::types::{ConversionConfig, TraversalOrder, DEFAULT_COMPRESSION_LEVEL};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for bidsify
#[derive(Parser, Debug)]
#[command(name = "bidsify")]
#[command(about = "Convert ICEBERG spine MRI acquisitions to BIDS and gzip NIfTI files")]
#[command(
    after_help = "Example usage:\n  bidsify /path/to/mri/files /path/to/bids/output"
)]
#[command(version)]
pub struct Cli {
    /// Root directory of the MRI files (one directory per acquisition)
    #[arg(value_name = "PATH_IN")]
    pub path_in: PathBuf,

    /// Output directory for BIDS-structured files
    #[arg(value_name = "PATH_OUT")]
    pub path_out: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Directory visiting order, which decides diffusion chunk numbering
    #[arg(short, long, default_value = "sorted")]
    pub order: OrderArg,

    /// Gzip compression level for NIfTI files (0-9)
    #[arg(short = 'l', long, default_value_t = DEFAULT_COMPRESSION_LEVEL)]
    pub compression_level: u32,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Builds the conversion config from the arguments
    pub fn config(&self) -> ConversionConfig {
        ConversionConfig::new(&self.path_in, &self.path_out)
            .with_traversal(self.order.clone().into())
            .with_compression_level(self.compression_level)
    }
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

/// Traversal order options
#[derive(Debug, Clone, ValueEnum)]
pub enum OrderArg {
    /// Sort entries by name (reproducible chunk numbers)
    Sorted,
    /// Keep the order the filesystem lists entries in
    Filesystem,
}

impl From<OrderArg> for TraversalOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Sorted => TraversalOrder::Sorted,
            OrderArg::Filesystem => TraversalOrder::Filesystem,
        }
    }
}
