pub mod api;
pub mod cli;
pub mod error;
pub mod extraction;
pub mod layout;
pub mod summary;
pub mod tabular;
pub mod transfer;
pub mod types;

pub use api::BidsConverter;
pub use cli::report::TextReport;
pub use error::{BidsError, Result};
pub use summary::{ConversionSummary, FileReport, FileStatus, SubjectOutcome, SubjectReport};
pub use types::*;
