//! Tests for unified dataset output and read-back.

use std::fs;

use stumpage_model::{CanonicalRecord, PeriodType};
use stumpage_transform::{
    convert_records, deduplicate, normalize_record, read_unified, write_unified,
};

fn record(source: &str, unit: &str, price: f64) -> CanonicalRecord {
    let mut record = CanonicalRecord::new(source, 2022, PeriodType::Annual);
    record.region = Some("Statewide".to_string());
    record.species = Some("Southern Pine".to_string());
    record.product_type = Some("Pine Sawtimber".to_string());
    record.unit = Some(unit.to_string());
    record.price_avg = Some(price);
    record
}

#[test]
fn header_line_follows_unified_column_order() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("processed/stumpage_unified.csv");
    write_unified(&[record("AL", "$/ton", 28.0)], &path).expect("write");
    let contents = fs::read_to_string(&path).expect("read");
    let header = contents.lines().next().unwrap_or_default();
    insta::assert_snapshot!(header, @"source,year,quarter,period_type,region,county,species,product_type,price_avg,price_low,price_high,unit,price_per_ton,conversion_factor,sample_size,notes");
    assert!(!dir.path().join("processed/stumpage_unified.csv.tmp").exists());
}

#[test]
fn written_records_read_back_unchanged() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("stumpage_unified.csv");
    let mut seasonal = record("NY", "$/mbf", 310.5);
    seasonal.period_type = PeriodType::SemiAnnual;
    seasonal.quarter = Some(2);
    seasonal.sample_size = Some(12);
    seasonal.notes = Some("Log rule: Doyle, International".to_string());
    let (records, _) = convert_records(vec![seasonal, record("GA", "$/ton", 24.0)]);

    write_unified(&records, &path).expect("write");
    let read = read_unified(&path).expect("read");
    assert_eq!(read, records);
}

#[test]
fn missing_dataset_reads_as_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let read = read_unified(&dir.path().join("absent.csv")).expect("read");
    assert!(read.is_empty());
}

#[test]
fn older_float_typed_columns_are_accepted() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("stumpage_unified.csv");
    fs::write(
        &path,
        "source,year,quarter,period_type,region,county,species,product_type,price_avg,price_low,price_high,unit,price_per_ton,conversion_factor,sample_size,notes\n\
         PA,2021,3.0,quarterly,Region 1,,Red Oak,sawtimber,450.0,,,$/mbf,52.94,8.5,7.0,\n",
    )
    .expect("write");
    let read = read_unified(&path).expect("read");
    assert_eq!(read[0].quarter, Some(3));
    assert_eq!(read[0].sample_size, Some(7));
    assert_eq!(read[0].county, None);
}

#[test]
fn ton_and_board_foot_sources_agree_after_conversion() {
    let by_ton = record("AL", "$/Ton", 28.0);
    let by_mbf = record("AR", "MBF Doyle", 196.0);
    let duplicate = {
        let mut avg_only = record("AR", "MBF Doyle", 190.0);
        avg_only.price_low = None;
        avg_only
    };
    let mut full = by_mbf.clone();
    full.price_low = Some(150.0);
    full.price_high = Some(240.0);

    let normalized: Vec<CanonicalRecord> = vec![by_ton, duplicate, full]
        .into_iter()
        .map(normalize_record)
        .collect();
    let (converted, stats) = convert_records(normalized);
    let (records, dropped) = deduplicate(converted);

    assert_eq!(dropped, 1);
    assert_eq!(stats.converted, 3);
    assert_eq!(records.len(), 2);
    for record in &records {
        assert_eq!(record.product_type.as_deref(), Some("sawtimber"));
        let per_ton = record.price_per_ton.unwrap_or_default();
        assert!((per_ton - 28.0).abs() < 1e-9, "{} gave {per_ton}", record.source);
    }
    assert_eq!(records[1].price_high, Some(240.0));
}
