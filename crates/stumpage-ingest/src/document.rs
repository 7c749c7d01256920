//! Pre-extracted document pages and the classifier pass over them.
//!
//! Text and table extraction from PDF bytes happens outside this crate. The
//! extractor output is stored as JSON, one file per source document:
//!
//! ```json
//! { "name": "avg-stump-val-10-24-03-25.pdf",
//!   "pages": [ { "number": 1, "text": "...", "tables": [[["SPECIES", "LOW"], ...]] } ] }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use stumpage_model::{ClassifiedRow, RawTable, SectionContext};

use crate::classify::{ClassifierConfig, scan_table};
use crate::error::{IngestError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedPage {
    #[serde(default)]
    pub number: usize,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub tables: Vec<RawTable>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Original document file name.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pages: Vec<ExtractedPage>,
}

/// Source of page text and table structures for one document.
pub trait DocumentExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedDocument>;
}

/// Reads extractor output saved as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentExtractor;

impl DocumentExtractor for JsonDocumentExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedDocument> {
        let bytes = fs::read(path).map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut document: ExtractedDocument =
            serde_json::from_slice(&bytes).map_err(|source| IngestError::JsonParse {
                path: path.to_path_buf(),
                source,
            })?;
        if document.name.is_empty() {
            document.name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(document)
    }
}

/// Lists extracted documents (`*.json`) in a directory, sorted by name.
pub fn list_document_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if path.is_file() && is_json {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Runs the classifier over every table of every page with text.
///
/// Section state is reset per page, seeded with the region named in the
/// page text, and carried across that page's tables in order.
pub fn classify_document(
    document: &ExtractedDocument,
    config: &ClassifierConfig,
) -> Vec<ClassifiedRow> {
    let mut rows = Vec::new();
    for page in &document.pages {
        let Some(text) = page.text.as_deref().filter(|text| !text.trim().is_empty()) else {
            debug!(page = page.number, "page without text skipped");
            continue;
        };
        let mut context = SectionContext::with_region(config.region_in_text(text));
        for table in page.tables.iter().filter(|table| table.rows().len() >= 2) {
            let (next, classified) = scan_table(table, context, config);
            rows.extend(classified);
            context = next;
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_without_text_are_skipped() {
        let table = RawTable::from_text_rows(&[
            &["SPECIES", "LOW", "HIGH"],
            &["Spruce", "30", "45"],
        ]);
        let document = ExtractedDocument {
            name: "doc.pdf".to_string(),
            pages: vec![
                ExtractedPage {
                    number: 1,
                    text: None,
                    tables: vec![table.clone()],
                },
                ExtractedPage {
                    number: 2,
                    text: Some("CENTRAL".to_string()),
                    tables: vec![table],
                },
            ],
        };
        let rows = classify_document(&document, &ClassifierConfig::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].region.as_deref(), Some("Central"));
    }

    #[test]
    fn section_markers_carry_across_tables_of_a_page() {
        let page = |number: usize, tables: Vec<RawTable>| ExtractedPage {
            number,
            text: Some("NORTHERN REGION".to_string()),
            tables,
        };
        let document = ExtractedDocument {
            name: "doc.pdf".to_string(),
            pages: vec![
                page(
                    1,
                    vec![
                        RawTable::from_text_rows(&[
                            &["SPECIES", "LOW", "HIGH"],
                            &["SOUTHERN", "", ""],
                            &["Hemlock", "40", "60"],
                        ]),
                        RawTable::from_text_rows(&[
                            &["SPECIES", "LOW", "HIGH"],
                            &["Spruce", "50", "70"],
                        ]),
                    ],
                ),
                page(
                    2,
                    vec![RawTable::from_text_rows(&[
                        &["SPECIES", "LOW", "HIGH"],
                        &["Aspen", "10", "15"],
                    ])],
                ),
            ],
        };
        let rows = classify_document(&document, &ClassifierConfig::default());
        let regions: Vec<(&str, &str)> = rows
            .iter()
            .map(|row| {
                (
                    row.species.as_deref().unwrap_or_default(),
                    row.region.as_deref().unwrap_or_default(),
                )
            })
            .collect();
        assert_eq!(
            regions,
            vec![
                ("Hemlock", "Southern"),
                ("Spruce", "Southern"),
                ("Aspen", "Northern"),
            ]
        );
    }
}
