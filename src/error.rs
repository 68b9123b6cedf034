use std::path::PathBuf;

use thiserror::Error;

use crate::command::parser::ParseError;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Table \"{0}\" already exists")]
    DuplicateTable(String),

    #[error("Table \"{0}\" does not exist")]
    UnknownTable(String),

    #[error("Invalid column definition: {0} (expected name:type)")]
    MalformedColumnSpec(String),

    #[error("Unknown data type: {0} (expected int, str or bool)")]
    UnknownType(String),

    #[error("Column \"{0}\" is defined more than once")]
    DuplicateColumn(String),

    #[error("Invalid table name: {0:?}")]
    InvalidName(String),

    #[error("Wrong number of values: expected {expected}, got {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("Invalid value for column {column}: {value}")]
    TypeCastError { column: String, value: String },

    #[error("Cannot assign an ID after {0}")]
    IdOverflow(i64),

    #[error("No records matched {0}")]
    NoMatchingRows(String),

    #[error("Malformed command: {0}")]
    MalformedCommand(#[from] ParseError),

    #[error("Data file {path} is unavailable: {reason}")]
    PersistenceUnavailable { path: PathBuf, reason: String },
}

impl DbError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DbError::PersistenceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
