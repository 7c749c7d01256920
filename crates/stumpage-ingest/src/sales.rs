//! Timber sale results aggregated into stumpage prices.
//!
//! Each sale contributes one $/MBF observation (winning bid over sold
//! volume). Observations are grouped per year and timber type.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, warn};

use stumpage_model::{CanonicalRecord, PeriodType};

use crate::adapter::SourceOutput;
use crate::config::SalesSource;
use crate::csv_table::{CsvTable, read_csv_table};
use crate::error::{IngestError, Result};
use crate::parse::{parse_price, parse_year, round2};

/// One sale reduced to what aggregation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TimberSale {
    pub year: i32,
    pub timber_type: String,
    pub price_per_mbf: f64,
}

/// Summary statistics for one (year, timber type) group.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleAggregate {
    pub year: i32,
    pub timber_type: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Groups sales per year and timber type, rounding statistics to cents.
pub fn aggregate_sales(sales: &[TimberSale]) -> Vec<SaleAggregate> {
    let mut groups: BTreeMap<(i32, &str), Vec<f64>> = BTreeMap::new();
    for sale in sales {
        groups
            .entry((sale.year, sale.timber_type.as_str()))
            .or_default()
            .push(sale.price_per_mbf);
    }
    groups
        .into_iter()
        .map(|((year, timber_type), prices)| {
            let count = prices.len();
            let sum: f64 = prices.iter().sum();
            let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
            let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            SaleAggregate {
                year,
                timber_type: timber_type.to_string(),
                mean: round2(sum / count as f64),
                min: round2(min),
                max: round2(max),
                count,
            }
        })
        .collect()
}

fn column(table: &CsvTable, names: &[&str], path: &Path) -> Result<usize> {
    names
        .iter()
        .find_map(|name| table.column_index(name))
        .ok_or_else(|| IngestError::MissingColumn {
            column: names.join("|"),
            path: path.to_path_buf(),
        })
}

#[derive(Clone, Copy)]
enum PriceColumns {
    PerMbf(usize),
    BidOverVolume { bid: usize, volume_mbf: usize },
}

/// Reads sale rows. A sale's price is taken from `price_per_mbf` when the
/// file has it, otherwise computed as `winning_bid / volume_mbf`.
pub fn read_sales(table: &CsvTable, path: &Path) -> Result<(Vec<TimberSale>, usize)> {
    let year_col = column(table, &["calendar_year", "fiscal_year", "fy", "year"], path)?;
    let type_col = column(table, &["timber_type", "type"], path)?;
    let price_cols = match table.column_index("price_per_mbf") {
        Some(index) => PriceColumns::PerMbf(index),
        None => PriceColumns::BidOverVolume {
            bid: column(table, &["winning_bid", "bid"], path)?,
            volume_mbf: column(table, &["volume_mbf"], path)?,
        },
    };
    let mut sales = Vec::new();
    let mut skipped = 0usize;
    for row in 0..table.rows.len() {
        let year = table.cell(row, year_col).and_then(parse_year);
        let timber_type = table.cell(row, type_col).map(str::to_lowercase);
        let price = match price_cols {
            PriceColumns::PerMbf(index) => table.cell(row, index).and_then(parse_price),
            PriceColumns::BidOverVolume { bid, volume_mbf } => {
                let bid = table.cell(row, bid).and_then(parse_price);
                let volume = table
                    .cell(row, volume_mbf)
                    .and_then(parse_price)
                    .filter(|volume| *volume > 0.0);
                bid.zip(volume).map(|(bid, volume)| bid / volume)
            }
        };
        match (year, timber_type, price) {
            (Some(year), Some(timber_type), Some(price_per_mbf)) => sales.push(TimberSale {
                year,
                timber_type,
                price_per_mbf,
            }),
            _ => {
                warn!(row, "sale skipped: missing year, type, or price");
                skipped += 1;
            }
        }
    }
    Ok((sales, skipped))
}

/// Loads and aggregates a sales file.
pub fn load_sales(code: &str, input: &SalesSource, raw_dir: &Path) -> Result<SourceOutput> {
    let path = raw_dir.join(&input.path);
    if !path.is_file() {
        info!(path = %path.display(), "sales file missing");
        return Ok(SourceOutput {
            missing_input: true,
            ..SourceOutput::default()
        });
    }
    let table = read_csv_table(&path)?;
    let (sales, skipped) = read_sales(&table, &path)?;
    let records = aggregate_sales(&sales)
        .into_iter()
        .map(|aggregate| sale_record(code, input, &aggregate))
        .collect();
    Ok(SourceOutput {
        records,
        skipped,
        missing_input: false,
    })
}

fn sale_record(code: &str, input: &SalesSource, aggregate: &SaleAggregate) -> CanonicalRecord {
    let species = input
        .species_by_type
        .get(&aggregate.timber_type)
        .unwrap_or(&input.default_species);
    let mut record = CanonicalRecord::new(code, aggregate.year, PeriodType::Annual);
    record.region = Some(input.region.clone());
    record.species = Some(species.clone());
    record.product_type = Some(input.product_type.clone());
    record.price_avg = Some(aggregate.mean);
    record.price_low = Some(aggregate.min);
    record.price_high = Some(aggregate.max);
    record.unit = Some(input.unit.clone());
    record.sample_size = i64::try_from(aggregate.count).ok();
    record.notes = Some(input.notes.replace("{year}", &aggregate.year.to_string()));
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(year: i32, timber_type: &str, price_per_mbf: f64) -> TimberSale {
        TimberSale {
            year,
            timber_type: timber_type.to_string(),
            price_per_mbf,
        }
    }

    #[test]
    fn aggregates_per_year_and_type() {
        let aggregates = aggregate_sales(&[
            sale(2024, "pine", 100.0),
            sale(2024, "hardwood", 300.0),
            sale(2024, "pine", 200.0),
            sale(2025, "pine", 150.0),
        ]);
        assert_eq!(aggregates.len(), 3);
        let pine_2024 = &aggregates[1];
        assert_eq!(pine_2024.timber_type, "pine");
        assert_eq!(pine_2024.mean, 150.0);
        assert_eq!(pine_2024.min, 100.0);
        assert_eq!(pine_2024.max, 200.0);
        assert_eq!(pine_2024.count, 2);
    }

    #[test]
    fn price_falls_back_to_bid_over_volume() {
        let table = CsvTable {
            headers: vec![
                "calendar_year".to_string(),
                "timber_type".to_string(),
                "volume_mbf".to_string(),
                "winning_bid".to_string(),
            ],
            rows: vec![
                vec!["2025".into(), "Pine".into(), "480.7".into(), "102177".into()],
                vec!["2025".into(), "pine".into(), "0".into(), "5000".into()],
            ],
        };
        let (sales, skipped) = read_sales(&table, Path::new("sales.csv")).unwrap();
        assert_eq!(skipped, 1);
        assert_eq!(sales[0].timber_type, "pine");
        assert!((sales[0].price_per_mbf - 212.56).abs() < 0.01);
    }
}
