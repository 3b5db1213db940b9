use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read price directory {path}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read price file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Price file {path} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: &'static str },
}
