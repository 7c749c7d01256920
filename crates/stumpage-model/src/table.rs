//! Raw table structures handed over by the document extractor.

use serde::{Deserialize, Serialize};

/// One row of a detected table. Cells may be absent; arity varies by row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTableRow(pub Vec<Option<String>>);

impl RawTableRow {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self(cells)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Trimmed cell text, `None` when the cell is absent or blank.
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.0
            .get(index)
            .and_then(|cell| cell.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    pub fn non_empty_cells(&self) -> impl Iterator<Item = &str> {
        (0..self.0.len()).filter_map(|index| self.cell(index))
    }

    pub fn is_blank(&self) -> bool {
        self.non_empty_cells().next().is_none()
    }
}

impl<S: Into<String>> FromIterator<Option<S>> for RawTableRow {
    fn from_iter<I: IntoIterator<Item = Option<S>>>(iter: I) -> Self {
        Self(iter.into_iter().map(|cell| cell.map(Into::into)).collect())
    }
}

/// An ordered list of rows from one detected table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTable(pub Vec<RawTableRow>);

impl RawTable {
    pub fn rows(&self) -> &[RawTableRow] {
        &self.0
    }

    /// Builds a table from string cells; empty strings become absent cells.
    pub fn from_text_rows(rows: &[&[&str]]) -> Self {
        Self(
            rows.iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| (!cell.is_empty()).then(|| (*cell).to_string()))
                        .collect()
                })
                .collect(),
        )
    }
}

/// Section state threaded through a single table scan.
///
/// Seeded per page and overwritten by section-marker rows; data rows read it
/// to fill cells their layout omits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionContext {
    pub current_region: Option<String>,
    pub current_species: Option<String>,
    pub current_product: Option<String>,
}

impl SectionContext {
    pub fn with_region(region: Option<String>) -> Self {
        Self {
            current_region: region,
            ..Self::default()
        }
    }
}

/// A data row after positional interpretation, before source mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedRow {
    pub region: Option<String>,
    pub species: Option<String>,
    pub product: Option<String>,
    pub price_low: Option<f64>,
    pub price_high: Option<f64>,
    pub unit: Option<String>,
}
