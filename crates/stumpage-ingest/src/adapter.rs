//! The generic source adapter.
//!
//! One adapter serves every source; behavior comes from the source's
//! [`SourceConfig`]. A missing input yields an empty output rather than an
//! error so that one absent file never blocks a run.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, info_span, warn};

use stumpage_model::{CanonicalRecord, ClassifiedRow, PeriodType};

use crate::config::{DocumentSource, FieldSource, SourceConfig, SourceInput, TableSource};
use crate::csv_table::{CsvTable, read_csv_table};
use crate::document::{
    DocumentExtractor, JsonDocumentExtractor, classify_document, list_document_files,
};
use crate::error::{IngestError, Result};
use crate::parse::{parse_count, parse_price, parse_quarter, parse_year, round2};
use crate::period::ReportPeriod;
use crate::sales::load_sales;
use crate::usfs::load_usfs;

/// Records produced by one source plus load diagnostics.
#[derive(Debug, Clone, Default)]
pub struct SourceOutput {
    pub records: Vec<CanonicalRecord>,
    /// Input rows or documents dropped during mapping.
    pub skipped: usize,
    /// The input file or directory did not exist.
    pub missing_input: bool,
}

impl SourceOutput {
    fn missing() -> Self {
        Self {
            missing_input: true,
            ..Self::default()
        }
    }
}

/// Loads one source from `raw_dir`.
pub fn load_source(config: &SourceConfig, raw_dir: &Path) -> Result<SourceOutput> {
    let span = info_span!("source", code = %config.code, kind = config.input.kind());
    let _guard = span.enter();
    let start = Instant::now();
    let output = match &config.input {
        SourceInput::Table(table) => load_table(&config.code, table, raw_dir)?,
        SourceInput::Documents(documents) => load_documents(
            &config.code,
            documents,
            raw_dir,
            &JsonDocumentExtractor,
        )?,
        SourceInput::Sales(sales) => load_sales(&config.code, sales, raw_dir)?,
        SourceInput::Usfs(usfs) => load_usfs(usfs, raw_dir)?,
    };
    info!(
        record_count = output.records.len(),
        skipped = output.skipped,
        missing_input = output.missing_input,
        duration_ms = start.elapsed().as_millis(),
        "source loaded"
    );
    Ok(output)
}

// ============================================================================
// Tabular sources
// ============================================================================

/// A [`FieldSource`] resolved against a concrete header.
#[derive(Debug, Clone)]
enum BoundField<'a> {
    Absent,
    Column(usize),
    Constant(&'a str),
    Format {
        column: usize,
        template: &'a str,
        digits_only: bool,
    },
    Lookup {
        column: usize,
        entries: &'a BTreeMap<String, String>,
        default: Option<&'a str>,
    },
}

impl<'a> BoundField<'a> {
    fn bind(field: &'a FieldSource, table: &CsvTable, path: &Path) -> Result<Self> {
        let missing = |column: &str| IngestError::MissingColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        };
        Ok(match field {
            FieldSource::Absent => BoundField::Absent,
            FieldSource::Column { name, optional } => match table.column_index(name) {
                Some(index) => BoundField::Column(index),
                None if *optional => BoundField::Absent,
                None => return Err(missing(name)),
            },
            FieldSource::FirstOf { names } => names
                .iter()
                .find_map(|name| table.column_index(name))
                .map(BoundField::Column)
                .ok_or_else(|| missing(&names.join("|")))?,
            FieldSource::Constant { value } => BoundField::Constant(value),
            FieldSource::Format {
                column,
                template,
                digits_only,
            } => BoundField::Format {
                column: table.column_index(column).ok_or_else(|| missing(column))?,
                template,
                digits_only: *digits_only,
            },
            FieldSource::Lookup {
                column,
                entries,
                default,
            } => BoundField::Lookup {
                column: table.column_index(column).ok_or_else(|| missing(column))?,
                entries,
                default: default.as_deref(),
            },
        })
    }

    fn value(&self, table: &CsvTable, row: usize) -> Option<String> {
        match self {
            BoundField::Absent => None,
            BoundField::Column(index) => table.cell(row, *index).map(str::to_string),
            BoundField::Constant(value) => Some((*value).to_string()),
            BoundField::Format {
                column,
                template,
                digits_only,
            } => {
                let cell = table.cell(row, *column)?;
                if *digits_only && !cell.bytes().all(|byte| byte.is_ascii_digit()) {
                    Some(cell.to_string())
                } else {
                    Some(template.replace("{}", cell))
                }
            }
            BoundField::Lookup {
                column,
                entries,
                default,
            } => table
                .cell(row, *column)
                .and_then(|cell| entries.get(&cell.to_lowercase()))
                .map(String::as_str)
                .or(*default)
                .map(str::to_string),
        }
    }
}

struct BoundMapping<'a> {
    year: BoundField<'a>,
    quarter: BoundField<'a>,
    region: BoundField<'a>,
    county: BoundField<'a>,
    species: BoundField<'a>,
    product_type: BoundField<'a>,
    price_avg: BoundField<'a>,
    price_low: BoundField<'a>,
    price_high: BoundField<'a>,
    unit: BoundField<'a>,
    sample_size: BoundField<'a>,
    notes: BoundField<'a>,
}

fn bind_mapping<'a>(
    code: &str,
    input: &'a TableSource,
    table: &CsvTable,
    path: &Path,
) -> Result<BoundMapping<'a>> {
    let fields = &input.fields;
    if fields.year.is_absent() {
        return Err(IngestError::InvalidConfig {
            code: code.to_string(),
            reason: "year mapping is required".to_string(),
        });
    }
    let bind = |field: &'a FieldSource| BoundField::bind(field, table, path);
    Ok(BoundMapping {
        year: bind(&fields.year)?,
        quarter: bind(&fields.quarter)?,
        region: bind(&fields.region)?,
        county: bind(&fields.county)?,
        species: bind(&fields.species)?,
        product_type: bind(&fields.product_type)?,
        price_avg: bind(&fields.price_avg)?,
        price_low: bind(&fields.price_low)?,
        price_high: bind(&fields.price_high)?,
        unit: bind(&fields.unit)?,
        sample_size: bind(&fields.sample_size)?,
        notes: bind(&fields.notes)?,
    })
}

fn load_table(code: &str, input: &TableSource, raw_dir: &Path) -> Result<SourceOutput> {
    let path = raw_dir.join(&input.path);
    if !path.is_file() {
        info!(path = %path.display(), "source file missing");
        return Ok(SourceOutput::missing());
    }
    let table = read_csv_table(&path)?;
    map_table(code, input, &table, &path)
}

/// Maps every row of an already-read table through the source's mapping.
pub fn map_table(
    code: &str,
    input: &TableSource,
    table: &CsvTable,
    path: &Path,
) -> Result<SourceOutput> {
    let mapping = bind_mapping(code, input, table, path)?;
    let mut output = SourceOutput::default();
    for row in 0..table.rows.len() {
        let raw_year = mapping.year.value(table, row);
        let Some(year) = raw_year.as_deref().and_then(parse_year) else {
            warn!(row, year = ?raw_year, "row skipped: unparseable year");
            output.skipped += 1;
            continue;
        };
        let text = |field: &BoundField<'_>| field.value(table, row);
        let mut record = CanonicalRecord::new(code, year, input.period_type);
        record.quarter = text(&mapping.quarter).as_deref().and_then(parse_quarter);
        record.region = text(&mapping.region);
        record.county = text(&mapping.county);
        record.species = text(&mapping.species);
        record.product_type = text(&mapping.product_type);
        record.price_avg = text(&mapping.price_avg).as_deref().and_then(parse_price);
        record.price_low = text(&mapping.price_low).as_deref().and_then(parse_price);
        record.price_high = text(&mapping.price_high).as_deref().and_then(parse_price);
        record.unit = text(&mapping.unit);
        record.sample_size = text(&mapping.sample_size).as_deref().and_then(parse_count);
        record.notes = text(&mapping.notes);
        output.records.push(record);
    }
    Ok(output)
}

// ============================================================================
// Document sources
// ============================================================================

fn midpoint(row: &ClassifiedRow) -> Option<f64> {
    match (row.price_low, row.price_high) {
        (Some(low), Some(high)) => Some(round2((low + high) / 2.0)),
        _ => None,
    }
}

/// Builds records from the classified rows of one report.
pub fn document_records(
    code: &str,
    input: &DocumentSource,
    period: &ReportPeriod,
    rows: Vec<ClassifiedRow>,
) -> Vec<CanonicalRecord> {
    let season = period.season();
    let quarter = match input.period_type {
        PeriodType::Annual => None,
        _ => Some(season.quarter()),
    };
    rows.into_iter()
        .map(|row| {
            let mut record = CanonicalRecord::new(code, period.start_year, input.period_type);
            let price_avg = if input.derive_midpoint {
                midpoint(&row)
            } else {
                None
            };
            let mut notes = format!("{season} report {}", period.date_span());
            if price_avg.is_some() {
                notes.push_str("; price_avg is the low/high midpoint");
            }
            record.quarter = quarter;
            record.region = row.region.or_else(|| Some(input.default_region.clone()));
            record.species = row.species;
            record.product_type = row.product;
            record.price_avg = price_avg;
            record.price_low = row.price_low;
            record.price_high = row.price_high;
            record.unit = row.unit;
            record.notes = Some(notes);
            record
        })
        .collect()
}

/// Loads every extracted report in the source directory.
pub fn load_documents(
    code: &str,
    input: &DocumentSource,
    raw_dir: &Path,
    extractor: &dyn DocumentExtractor,
) -> Result<SourceOutput> {
    let dir = raw_dir.join(&input.dir);
    if !dir.is_dir() {
        info!(path = %dir.display(), "document directory missing");
        return Ok(SourceOutput::missing());
    }
    let mut output = SourceOutput::default();
    for path in list_document_files(&dir)? {
        let document = extractor.extract(&path)?;
        let Some(period) = ReportPeriod::from_file_name(&document.name) else {
            warn!(document = %document.name, "document skipped: no report period in name");
            output.skipped += 1;
            continue;
        };
        let rows = classify_document(&document, &input.classifier);
        debug!(
            document = %document.name,
            page_count = document.pages.len(),
            row_count = rows.len(),
            "document classified"
        );
        output
            .records
            .extend(document_records(code, input, &period, rows));
    }
    Ok(output)
}
