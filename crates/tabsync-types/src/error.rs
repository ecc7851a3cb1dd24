use thiserror::Error;

use crate::index_path::IndexPath;

/// Errors produced when an edit script is applied to a snapshot it does not
/// describe.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplyError {
    #[error("section index {index} out of range (section count {count})")]
    SectionOutOfRange { index: usize, count: usize },

    #[error("row index {row} out of range in section {section} (row count {count})")]
    RowOutOfRange {
        section: usize,
        row: usize,
        count: usize,
    },

    #[error("section {index} does not hold the key being deleted")]
    SectionKeyMismatch { index: usize },

    #[error("row {path} does not hold the value being deleted")]
    RowValueMismatch { path: IndexPath },

    #[error("section {index} deleted more than once")]
    DuplicateSectionDelete { index: usize },

    #[error("row {path} deleted more than once")]
    DuplicateRowDelete { path: IndexPath },
}

/// Convenience alias for script application results.
pub type ApplyResult<T> = Result<T, ApplyError>;
