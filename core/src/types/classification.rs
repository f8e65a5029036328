use super::{Modality, Subfolder};
use std::fmt;

/// Result of classifying one primary data file
///
/// Carries the modality and, for multi-part modalities, the chunk index that
/// was assigned from the subject's [`ChunkCounter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ScanClassification {
    pub modality: Modality,
    pub chunk: Option<u32>,
}

impl ScanClassification {
    /// Creates a classification for a single-part modality
    pub fn single(modality: Modality) -> Self {
        Self {
            modality,
            chunk: None,
        }
    }

    /// Creates a classification carrying a chunk index
    pub fn chunked(modality: Modality, chunk: u32) -> Self {
        Self {
            modality,
            chunk: Some(chunk),
        }
    }

    /// Returns the modality token used after the subject id in output filenames
    ///
    /// # Example
    ///
    /// ```
    /// use bidsify_core::{Modality, ScanClassification};
    ///
    /// assert_eq!(ScanClassification::single(Modality::MtOn).token(), "mt-on_MTS");
    /// assert_eq!(ScanClassification::chunked(Modality::Dwi, 2).token(), "chunk-2_DWI");
    /// ```
    pub fn token(&self) -> String {
        match self.chunk {
            Some(n) => format!("chunk-{}_{}", n, self.modality.suffix()),
            None => self.modality.suffix().to_string(),
        }
    }

    /// Returns the output subfolder
    pub fn subfolder(&self) -> Subfolder {
        self.modality.subfolder()
    }
}

impl fmt::Display for ScanClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.subfolder(), self.token())
    }
}

/// Per-subject sequence counter for multi-part acquisitions
///
/// Starts at 1. The value is consumed by classification: each diffusion file
/// receives the current value and the counter advances by one. A fresh
/// counter is used for every subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkCounter {
    next: u32,
}

impl ChunkCounter {
    /// Creates a counter starting at 1
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns the value the next multi-part file will receive
    pub fn peek(&self) -> u32 {
        self.next
    }

    /// Returns the current value and the advanced counter
    pub fn advance(self) -> (u32, Self) {
        (
            self.next,
            Self {
                next: self.next + 1,
            },
        )
    }
}

impl Default for ChunkCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        assert_eq!(ScanClassification::single(Modality::T2).token(), "T2");
        assert_eq!(ScanClassification::single(Modality::MtOff).token(), "mt-off_MTS");
        assert_eq!(ScanClassification::single(Modality::T1Map).token(), "T1map");
        assert_eq!(ScanClassification::single(Modality::Unit1).token(), "UNIT1");
        assert_eq!(
            ScanClassification::chunked(Modality::Dwi, 1).token(),
            "chunk-1_DWI"
        );
    }

    #[test]
    fn test_display() {
        let c = ScanClassification::chunked(Modality::Dwi, 3);
        assert_eq!(c.to_string(), "dwi/chunk-3_DWI");
    }

    #[test]
    fn test_counter_starts_at_one() {
        let counter = ChunkCounter::new();
        assert_eq!(counter.peek(), 1);

        let (first, counter) = counter.advance();
        let (second, counter) = counter.advance();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(counter.peek(), 3);
    }
}
