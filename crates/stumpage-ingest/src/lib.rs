pub mod adapter;
pub mod classify;
pub mod config;
pub mod csv_table;
pub mod document;
pub mod error;
pub mod parse;
pub mod period;
pub mod sales;
pub mod sources;
pub mod usfs;

pub use adapter::{SourceOutput, document_records, load_documents, load_source, map_table};
pub use classify::{
    ClassifierConfig, DataCells, RegionLabel, RowKind, classify_row, classify_table, scan_table,
};
pub use config::{
    DocumentSource, FieldMapping, FieldSource, SalesSource, SourceConfig, SourceInput, TableSource,
    UsfsSource, load_source_configs,
};
pub use csv_table::{CsvTable, read_csv_table};
pub use document::{
    DocumentExtractor, ExtractedDocument, ExtractedPage, JsonDocumentExtractor, classify_document,
    list_document_files,
};
pub use error::{IngestError, Result};
pub use parse::{parse_count, parse_price, parse_quarter, parse_year, round2};
pub use period::{ReportPeriod, Season};
pub use sales::{SaleAggregate, TimberSale, aggregate_sales, read_sales};
pub use sources::builtin_sources;
pub use usfs::load_usfs;
