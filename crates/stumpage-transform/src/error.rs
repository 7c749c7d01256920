//! Error types for record transformation and dataset output.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An existing unified dataset could not be read back.
    #[error("failed to read unified dataset {path}: {source}")]
    DatasetRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to build unified frame: {source}")]
    Frame {
        #[source]
        source: PolarsError,
    },

    #[error("failed to write unified dataset {path}: {source}")]
    DatasetWrite {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}

pub type Result<T> = std::result::Result<T, TransformError>;
