//! End-to-end tests for extracted report documents.

use std::fs;

use serde_json::json;
use stumpage_ingest::{SourceConfig, builtin_sources, load_source};
use stumpage_model::PeriodType;

fn new_hampshire() -> SourceConfig {
    builtin_sources()
        .into_iter()
        .find(|source| source.code == "NH")
        .expect("NH source")
}

#[test]
fn report_pages_become_semi_annual_records() {
    let dir = tempfile::tempdir().expect("temp dir");
    let extracted = dir.path().join("nh_dra/extracted");
    fs::create_dir_all(&extracted).expect("create dir");
    let document = json!({
        "name": "avg-stump-val-10-24-03-25.pdf",
        "pages": [
            { "number": 1, "text": null, "tables": [] },
            {
                "number": 2,
                "text": "AVERAGE STUMPAGE VALUES - NORTHERN REGION",
                "tables": [[
                    ["SPECIES", "PRODUCT", "LOW", "HIGH", "UNIT"],
                    ["White Pine", "Sawlogs", "$150", "$250", "MBF"],
                    ["Hemlock", "Sawlogs", "$40", null, "MBF"],
                    ["TOTAL", null, "190", "250", null]
                ]]
            },
            {
                "number": 3,
                "text": "SOUTHERN REGION",
                "tables": [[
                    ["SPECIES", "LOW", "HIGH", "UNIT"],
                    ["Pulpwood", null, null, null],
                    ["Hardwood", "8", "12", "TON"]
                ]]
            }
        ]
    });
    fs::write(
        extracted.join("avg-stump-val-10-24-03-25.json"),
        serde_json::to_vec(&document).expect("serialize"),
    )
    .expect("write document");
    fs::write(
        extracted.join("notes.json"),
        serde_json::to_vec(&json!({ "name": "cover-letter.pdf", "pages": [] })).expect("serialize"),
    )
    .expect("write document");
    fs::write(extracted.join("readme.txt"), "not a document").expect("write file");

    let output = load_source(&new_hampshire(), dir.path()).expect("load");
    assert_eq!(output.skipped, 1);
    assert_eq!(output.records.len(), 3);

    let pine = &output.records[0];
    assert_eq!(pine.source, "NH");
    assert_eq!(pine.year, 2024);
    assert_eq!(pine.quarter, Some(4));
    assert_eq!(pine.period_type, PeriodType::SemiAnnual);
    assert_eq!(pine.region.as_deref(), Some("Northern"));
    assert_eq!(pine.product_type.as_deref(), Some("Sawlogs"));
    assert_eq!(pine.price_avg, Some(200.0));
    assert_eq!(
        pine.notes.as_deref(),
        Some("Fall report 10/2024-03/2025; price_avg is the low/high midpoint")
    );

    let hemlock = &output.records[1];
    assert_eq!(hemlock.price_low, Some(40.0));
    assert_eq!(hemlock.price_avg, None);
    assert_eq!(hemlock.notes.as_deref(), Some("Fall report 10/2024-03/2025"));

    let hardwood = &output.records[2];
    assert_eq!(hardwood.region.as_deref(), Some("Southern"));
    assert_eq!(hardwood.product_type.as_deref(), Some("Pulpwood"));
    assert_eq!(hardwood.unit.as_deref(), Some("TON"));
}

#[test]
fn missing_directory_is_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = load_source(&new_hampshire(), dir.path()).expect("load");
    assert!(output.missing_input);
}
