//! Tests for stumpage-model types.

use stumpage_model::{CanonicalRecord, PeriodType, RawTableRow, SectionContext, UNIFIED_COLUMNS};

#[test]
fn unified_columns_start_with_key_fields() {
    assert_eq!(UNIFIED_COLUMNS.len(), 16);
    assert_eq!(&UNIFIED_COLUMNS[..4], &["source", "year", "quarter", "period_type"]);
    assert_eq!(UNIFIED_COLUMNS[15], "notes");
}

#[test]
fn key_ignores_prices_and_notes() {
    let mut left = CanonicalRecord::new("PA", 2024, PeriodType::Quarterly);
    left.quarter = Some(2);
    left.species = Some("Red Oak".to_string());
    left.product_type = Some("sawtimber".to_string());
    let mut right = left.clone();
    right.price_avg = Some(410.0);
    right.notes = Some("revised".to_string());
    assert_eq!(left.key(), right.key());

    right.quarter = Some(3);
    assert_ne!(left.key(), right.key());
}

#[test]
fn record_deserializes_from_json_with_float_quarter() {
    let json = r#"{
        "source": "NY", "year": 2023, "quarter": 3.0, "period_type": "semi-annual",
        "region": "Statewide", "county": null, "species": "Sugar Maple",
        "product_type": "sawtimber", "price_avg": 520.0, "price_low": null,
        "price_high": null, "unit": "$/mbf", "price_per_ton": null,
        "conversion_factor": null, "sample_size": 12.0, "notes": null
    }"#;
    let record: CanonicalRecord = serde_json::from_str(json).expect("deserialize record");
    assert_eq!(record.quarter, Some(3));
    assert_eq!(record.period_type, PeriodType::SemiAnnual);
    assert_eq!(record.sample_size, Some(12));
}

#[test]
fn section_context_seeds_region_only() {
    let context = SectionContext::with_region(Some("NORTHERN".to_string()));
    assert_eq!(context.current_region.as_deref(), Some("NORTHERN"));
    assert!(context.current_species.is_none());
    assert!(context.current_product.is_none());
}

#[test]
fn blank_row_detection() {
    let row = RawTableRow::new(vec![None, Some(" ".to_string())]);
    assert!(row.is_blank());
    assert_eq!(row.len(), 2);
}
