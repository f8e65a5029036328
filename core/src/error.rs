use std::path::PathBuf;
use thiserror::Error;

/// Result type for bidsify operations
pub type Result<T> = std::result::Result<T, BidsError>;

/// Error types for bidsify operations
#[derive(Error, Debug)]
pub enum BidsError {
    /// Directory name matches neither subject naming grammar
    #[error("Cannot determine subject id from directory name: {0}")]
    UnrecognizedSubjectPattern(String),

    /// Path expected to be a directory is not one
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// I/O error tied to a specific file
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Required CSV column is absent
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Invalid value in an input table
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl BidsError {
    /// Wraps an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BidsError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = BidsError::io(
            "/data/in/scan.nii",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/data/in/scan.nii"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn test_unrecognized_subject_message() {
        let err = BidsError::UnrecognizedSubjectPattern("misc_folder".to_string());
        assert_eq!(
            err.to_string(),
            "Cannot determine subject id from directory name: misc_folder"
        );
    }
}
