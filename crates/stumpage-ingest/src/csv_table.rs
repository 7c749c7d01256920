use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{IngestError, Result};

/// A parsed CSV file: one header row plus string cells padded to its width.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Index of a column by case-insensitive header match.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Trimmed, non-empty cell text at `(row, column)`.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty() && !is_null_marker(value))
    }
}

// Files written by dataframe tools spell missing values out.
fn is_null_marker(value: &str) -> bool {
    matches!(value, "NaN" | "nan" | "None" | "null" | "NA")
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Reads a headed CSV file. Blank lines are skipped and short rows padded.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }
    let mut rows_iter = raw_rows.into_iter();
    let Some(header_row) = rows_iter.next() else {
        return Ok(CsvTable::default());
    };
    let headers: Vec<String> = header_row.iter().map(|value| normalize_header(value)).collect();
    let rows = rows_iter
        .map(|mut row| {
            row.resize(headers.len(), String::new());
            row
        })
        .collect();
    Ok(CsvTable { headers, rows })
}
