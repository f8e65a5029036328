use std::fmt;

/// Canonical BIDS subject identifier (`sub-<label>`)
///
/// Construct it through [`crate::extraction::extract_subject_id`]; the label
/// is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(transparent))]
pub struct SubjectId(String);

impl SubjectId {
    /// BIDS subject entity prefix
    pub const PREFIX: &'static str = "sub-";

    /// Creates a subject id from a label (without the `sub-` prefix)
    ///
    /// Returns `None` for an empty label.
    pub fn from_label(label: &str) -> Option<Self> {
        if label.is_empty() {
            None
        } else {
            Some(Self(format!("{}{}", Self::PREFIX, label)))
        }
    }

    /// Returns the full identifier, including the `sub-` prefix
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the label without the `sub-` prefix
    pub fn label(&self) -> &str {
        &self.0[Self::PREFIX.len()..]
    }
}

impl AsRef<str> for SubjectId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
