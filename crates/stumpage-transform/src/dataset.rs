//! Reading and writing the unified dataset file.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use polars::prelude::{CsvWriter, SerWriter};
use tracing::{debug, info};

use stumpage_model::CanonicalRecord;

use crate::error::{Result, TransformError};
use crate::frame_builder::build_unified_frame;

/// Reads a previously written unified dataset.
///
/// Returns an empty list when the file does not exist.
pub fn read_unified(path: &Path) -> Result<Vec<CanonicalRecord>> {
    if !path.is_file() {
        debug!(path = %path.display(), "no existing unified dataset");
        return Ok(Vec::new());
    }
    let mut reader = csv::Reader::from_path(path).map_err(|source| TransformError::DatasetRead {
        path: path.to_path_buf(),
        source,
    })?;
    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<CanonicalRecord>, csv::Error>>()
        .map_err(|source| TransformError::DatasetRead {
            path: path.to_path_buf(),
            source,
        })?;
    info!(path = %path.display(), record_count = records.len(), "existing dataset read");
    Ok(records)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes records as CSV in the unified column order.
///
/// The file is written next to its destination and renamed into place, so
/// an interrupted run leaves the previous dataset intact.
pub fn write_unified(records: &[CanonicalRecord], path: &Path) -> Result<()> {
    let io_error = |source| TransformError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let mut frame = build_unified_frame(records)?;
    let staging = staging_path(path);
    {
        let mut file = File::create(&staging).map_err(io_error)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut frame)
            .map_err(|source| TransformError::DatasetWrite {
                path: path.to_path_buf(),
                source,
            })?;
    }
    fs::rename(&staging, path).map_err(io_error)?;
    info!(path = %path.display(), record_count = records.len(), "unified dataset written");
    Ok(())
}
