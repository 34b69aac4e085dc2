// src/error.rs

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot open '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed input: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column '{column}' is missing")]
    MissingColumn { column: String },

    #[error("column '{column}', row {row}: '{value}' is not a number")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },

    #[error("file format '{0}' is not supported, expected csv or tsv")]
    UnsupportedFormat(String),

    #[error(
        "cannot tell the format of '{}' from its extension, pass --format csv or --format tsv",
        .path.display()
    )]
    UnknownFormat { path: PathBuf },

    #[error("failed to export chart: {0}")]
    Export(String),
}
