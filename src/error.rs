//! Error types shared by every pipeline stage.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`], used for exit codes and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingInput,
    SchemaViolation,
    EmptyInput,
    Io,
}

#[derive(Debug, Error)]
pub enum Error {
    /// Required file or table absent
    #[error("{what} not found: {}", path.display())]
    MissingInput { what: &'static str, path: PathBuf },

    /// Required columns absent from a table
    #[error("missing columns in {table}: {}", columns.join(", "))]
    MissingColumns { table: String, columns: Vec<String> },

    /// Columns present but not the ones the fitted state expects
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Persisted scaler/model pair cannot be used together
    #[error("incompatible artifact: {0}")]
    IncompatibleArtifact(String),

    /// Zero usable rows after cleaning
    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingInput { .. } => ErrorKind::MissingInput,
            Error::MissingColumns { .. }
            | Error::SchemaMismatch(_)
            | Error::IncompatibleArtifact(_) => ErrorKind::SchemaViolation,
            Error::EmptyInput(_) => ErrorKind::EmptyInput,
            Error::Io(_) | Error::Csv(_) | Error::Json(_) => ErrorKind::Io,
        }
    }

    /// Process exit status for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Io => 1,
            _ => 2,
        }
    }

    pub(crate) fn missing_columns(table: impl Into<String>, columns: Vec<String>) -> Self {
        Error::MissingColumns {
            table: table.into(),
            columns,
        }
    }
}
