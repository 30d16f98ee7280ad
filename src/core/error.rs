use thiserror::Error;

use crate::column::ColumnType;

/// Error type definitions
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Unsupported table type: {0}")]
    UnsupportedTableType(String),

    #[error("Expression `{expr}` failed: {message}")]
    Expression { expr: String, message: String },

    #[error("Invalid result type: {0}")]
    InvalidResultType(String),

    #[error("Result length mismatch: expected {expected}, found {found}")]
    ResultLengthMismatch { expected: usize, found: usize },

    #[error("Duplicate column name: {0}")]
    DuplicateColumnName(String),

    #[error("Inconsistent row count: expected {expected}, found {found}")]
    InconsistentRowCount { expected: usize, found: usize },

    #[error("Length mismatch: expected {expected}, actual {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Index out of bounds: index {index}, size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error("Column type mismatch: column {name}, expected {expected:?}, found {found:?}")]
    ColumnTypeMismatch {
        name: String,
        expected: ColumnType,
        found: ColumnType,
    },

    #[error("Cast error: {0}")]
    Cast(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid regex: {0}")]
    InvalidRegex(String),

    #[error("JSON error")]
    Json(#[source] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::InvalidRegex(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
