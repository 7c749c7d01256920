//! National forest administered stumpage (USFS PNW research tables).
//!
//! Two files feed this source: regional averages by subregion and
//! species-level prices by forest service region. Records are written under
//! state codes derived from the region names, so several source codes come
//! out of one feed.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info};

use stumpage_model::{CanonicalRecord, PeriodType};

use crate::adapter::SourceOutput;
use crate::config::UsfsSource;
use crate::csv_table::{CsvTable, read_csv_table};
use crate::error::{IngestError, Result};
use crate::parse::{parse_price, parse_year};

const SUBREGION_TO_STATE: &[(&str, &str)] = &[
    ("Montana", "MT"),
    ("Idaho", "ID"),
    ("Washington", "WA"),
    ("Oregon", "OR"),
    ("California", "CA"),
    ("Alaska", "AK"),
    ("Montana_Idaho", "MT_ID"),
    ("Washington_Oregon", "WA_OR"),
    ("Northern_Region_MT_ID", "MT_ID"),
    ("Intermountain_Region", "ID"),
    ("Pacific_Northwest_WA_OR", "WA_OR"),
    ("Pacific_Southwest_CA", "CA"),
];

const SPECIES_NAMES: &[(&str, &str)] = &[
    ("Douglas-fir", "douglas_fir"),
    ("Ponderosa pine", "ponderosa_pine"),
    ("Western white pine", "white_pine"),
    ("Lodgepole pine", "lodgepole_pine"),
    ("Engelmann spruce", "engelmann_spruce"),
    ("Western hemlock", "western_hemlock"),
    ("Cedars", "cedar"),
    ("Larch", "western_larch"),
    ("True firs", "true_fir"),
    ("All species", "all_species"),
    ("Western redcedar", "western_redcedar"),
    ("Sitka spruce", "sitka_spruce"),
    ("Red alder", "red_alder"),
    ("Other hardwoods", "hardwood_other"),
    ("Other softwoods", "softwood_other"),
];

const ALL_SPECIES: &str = "all_species";

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, value)| *value)
}

/// State code for a region name; unknown names keep their text with `-`
/// in place of `_`.
pub fn state_code(region: &str) -> String {
    lookup(SUBREGION_TO_STATE, region)
        .map_or_else(|| region.replace('_', "-"), str::to_string)
}

/// Canonical snake_case species name.
pub fn species_name(raw: &str) -> String {
    lookup(SPECIES_NAMES, raw)
        .map_or_else(|| raw.to_lowercase().replace(' ', "_"), str::to_string)
}

fn notes(marker: &str, table_label: Option<&str>) -> String {
    match table_label {
        Some(label) => format!("{marker} National Forest stumpage. {label}. Administered pricing, not market."),
        None => format!("{marker} National Forest stumpage. Administered pricing, not market."),
    }
}

fn required(table: &CsvTable, name: &str, path: &Path) -> Result<usize> {
    table
        .column_index(name)
        .ok_or_else(|| IngestError::MissingColumn {
            column: name.to_string(),
            path: path.to_path_buf(),
        })
}

fn base_record(source: String, year: i32, price_per_mbf: f64) -> CanonicalRecord {
    let mut record = CanonicalRecord::new(source, year, PeriodType::Annual);
    record.product_type = Some("sawtimber".to_string());
    record.price_avg = Some(price_per_mbf);
    record.unit = Some("$/mbf".to_string());
    record
}

/// Regional averages. A subregion differing from its region names the
/// record's region; otherwise the record is statewide.
pub fn combined_records(
    table: &CsvTable,
    path: &Path,
    marker: &str,
) -> Result<(Vec<CanonicalRecord>, usize)> {
    let year_col = required(table, "year", path)?;
    let region_col = required(table, "region", path)?;
    let price_col = required(table, "price_per_mbf", path)?;
    let subregion_col = table.column_index("subregion");
    let label_col = table.column_index("table");
    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in 0..table.rows.len() {
        let year = table.cell(row, year_col).and_then(parse_year);
        let region = table.cell(row, region_col);
        let price = table.cell(row, price_col).and_then(parse_price);
        let (Some(year), Some(region), Some(price)) = (year, region, price) else {
            skipped += 1;
            continue;
        };
        let subregion = subregion_col
            .and_then(|col| table.cell(row, col))
            .unwrap_or(region);
        let source = lookup(SUBREGION_TO_STATE, subregion)
            .map_or_else(|| state_code(region), str::to_string);
        let mut record = base_record(source, year, price);
        record.region = Some(if subregion == region {
            "Statewide".to_string()
        } else {
            subregion.to_string()
        });
        record.species = Some(ALL_SPECIES.to_string());
        record.notes = Some(notes(marker, label_col.and_then(|col| table.cell(row, col))));
        records.push(record);
    }
    Ok((records, skipped))
}

/// Species-level prices by forest service region.
pub fn species_records(
    table: &CsvTable,
    path: &Path,
    marker: &str,
) -> Result<(Vec<CanonicalRecord>, usize)> {
    let year_col = required(table, "year", path)?;
    let region_col = required(table, "region", path)?;
    let species_col = required(table, "species", path)?;
    let price_col = required(table, "price_per_mbf", path)?;
    let label_col = table.column_index("table");
    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in 0..table.rows.len() {
        let year = table.cell(row, year_col).and_then(parse_year);
        let region = table.cell(row, region_col);
        let species = table.cell(row, species_col);
        let price = table.cell(row, price_col).and_then(parse_price);
        let (Some(year), Some(region), Some(species), Some(price)) = (year, region, species, price)
        else {
            skipped += 1;
            continue;
        };
        let mut record = base_record(state_code(region), year, price);
        record.region = Some(region.replace('_', " "));
        record.species = Some(species_name(species));
        record.notes = Some(notes(marker, label_col.and_then(|col| table.cell(row, col))));
        records.push(record);
    }
    Ok((records, skipped))
}

/// Keeps the last record per (source, year, species, region).
fn keep_last(records: Vec<CanonicalRecord>) -> Vec<CanonicalRecord> {
    let mut seen = BTreeSet::new();
    let mut kept: Vec<CanonicalRecord> = records
        .into_iter()
        .rev()
        .filter(|record| {
            seen.insert((
                record.source.clone(),
                record.year,
                record.species.clone(),
                record.region.clone(),
            ))
        })
        .collect();
    kept.reverse();
    kept
}

fn read_optional(path: &Path) -> Result<Option<CsvTable>> {
    if path.is_file() {
        read_csv_table(path).map(Some)
    } else {
        info!(path = %path.display(), "usfs file missing");
        Ok(None)
    }
}

pub fn load_usfs(input: &UsfsSource, raw_dir: &Path) -> Result<SourceOutput> {
    let combined_path = raw_dir.join(&input.combined_path);
    let species_path = raw_dir.join(&input.species_path);
    let combined = read_optional(&combined_path)?;
    let species = read_optional(&species_path)?;
    if combined.is_none() && species.is_none() {
        return Ok(SourceOutput {
            missing_input: true,
            ..SourceOutput::default()
        });
    }
    let mut records = Vec::new();
    let mut skipped = 0usize;
    if let Some(table) = &combined {
        let (rows, dropped) = combined_records(table, &combined_path, &input.marker)?;
        records.extend(rows);
        skipped += dropped;
    }
    if let Some(table) = &species {
        let (rows, dropped) = species_records(table, &species_path, &input.marker)?;
        records.extend(rows);
        skipped += dropped;
    }
    let before = records.len();
    let records = keep_last(records);
    debug!(
        duplicate_count = before - records.len(),
        "usfs duplicates dropped"
    );
    Ok(SourceOutput {
        records,
        skipped,
        missing_input: false,
    })
}
