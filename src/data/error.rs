use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy shared by the loader, aggregation, builders and router
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum DashboardError {
    /// File missing, unreadable, or not valid delimited tabular data.
    #[error("cannot read data source {}: {reason}", path.display())]
    DataSource { path: PathBuf, reason: String },

    /// A single field could not be coerced to its column type.
    #[error("{file}, row {row}, column '{column}': cannot parse '{value}'")]
    DataFormat {
        file: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("invalid data: {0}")]
    Validation(String),

    #[error("cannot compute {what} over an empty table")]
    EmptyInput { what: &'static str },

    #[error("segment '{segment}' has zero investment")]
    DivisionByZero { segment: String },

    #[error("unknown forecast scenario '{name}'")]
    InvalidSelection { name: String },

    #[error("segment '{segment}' matched {matches} rows, expected exactly one")]
    SegmentNotFound { segment: String, matches: usize },

    #[error("unknown view '{key}'")]
    UnknownView { key: String },
}

pub type Result<T> = std::result::Result<T, DashboardError>;
