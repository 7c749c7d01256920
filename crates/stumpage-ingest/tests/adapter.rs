//! Tests for the generic source adapter over tabular inputs.

use std::fs;
use std::path::Path;

use stumpage_ingest::{IngestError, SourceConfig, builtin_sources, load_source};
use stumpage_model::PeriodType;

fn builtin(code: &str) -> SourceConfig {
    builtin_sources()
        .into_iter()
        .find(|source| source.code == code)
        .expect("built-in source")
}

fn write(raw_dir: &Path, relative: &str, contents: &str) {
    let path = raw_dir.join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("create dir");
    fs::write(path, contents).expect("write file");
}

#[test]
fn missing_file_yields_empty_output() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = load_source(&builtin("PA"), dir.path()).expect("load");
    assert!(output.missing_input);
    assert!(output.records.is_empty());
}

#[test]
fn quarterly_table_maps_named_columns() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(
        dir.path(),
        "pa_extension/pa_stumpage_parsed.csv",
        "year,quarter,region,species,product_type,price_avg,price_low,price_high,unit,sample_size\n\
         2023,2.0,Region 1,Red Oak,Sawtimber,\"$1,250.00\",900,1600,$/MBF,14\n\
         2023,3,Region 2,White Pine,Pulpwood,NaN,,,$/ton,\n\
         FY23,1,Region 2,Ash,Sawtimber,300,,,$/MBF,3\n",
    );
    let output = load_source(&builtin("PA"), dir.path()).expect("load");
    assert_eq!(output.records.len(), 2);
    assert_eq!(output.skipped, 1);

    let first = &output.records[0];
    assert_eq!(first.source, "PA");
    assert_eq!(first.year, 2023);
    assert_eq!(first.quarter, Some(2));
    assert_eq!(first.period_type, PeriodType::Quarterly);
    assert_eq!(first.price_avg, Some(1250.0));
    assert_eq!(first.price_low, Some(900.0));
    assert_eq!(first.sample_size, Some(14));
    assert_eq!(first.unit.as_deref(), Some("$/MBF"));
    assert_eq!(first.price_per_ton, None);

    let second = &output.records[1];
    assert_eq!(second.price_avg, None);
    assert_eq!(second.sample_size, None);
}

#[test]
fn constants_formats_and_lookups() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(
        dir.path(),
        "wi_dnr/wi_stumpage_parsed.csv",
        "year,zone,species,product_type,price,program\n\
         2022,3,Aspen,Pulpwood,32.5,MFL\n\
         2022,North,Aspen,Pulpwood,30,MFL\n",
    );
    write(
        dir.path(),
        "mi_dnr/mi_stumpage_parsed.csv",
        "year,quarter,market_area,species_group,product,avg_bid_index,volume\n\
         2021,4,UP,All,SAW,112.4,5300.0\n\
         2021,4,UP,All,MIX,98.0,\n",
    );

    let wi = load_source(&builtin("WI"), dir.path()).expect("load WI");
    assert_eq!(wi.records[0].region.as_deref(), Some("Zone 3"));
    assert_eq!(wi.records[1].region.as_deref(), Some("North"));
    assert_eq!(wi.records[0].unit.as_deref(), Some("$/cord"));
    assert_eq!(wi.records[0].notes.as_deref(), Some("Program: MFL"));
    assert_eq!(wi.records[0].quarter, None);

    let mi = load_source(&builtin("MI"), dir.path()).expect("load MI");
    assert_eq!(mi.records[0].product_type.as_deref(), Some("sawtimber"));
    assert_eq!(mi.records[1].product_type.as_deref(), Some("total_index"));
    assert_eq!(mi.records[0].unit.as_deref(), Some("index"));
    assert_eq!(mi.records[0].sample_size, Some(5300));
}

#[test]
fn optional_columns_may_be_absent() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(
        dir.path(),
        "al_forestry/al_stumpage_parsed.csv",
        "year,region,species,product_type,price_avg,unit\n2020,North,Pine,Sawtimber,28.4,$/ton\n",
    );
    let output = load_source(&builtin("AL"), dir.path()).expect("load");
    assert_eq!(output.records.len(), 1);
    assert_eq!(output.records[0].price_low, None);
}

#[test]
fn missing_required_column_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(
        dir.path(),
        "la_forestry/la_stumpage_parsed.csv",
        "year,quarter,region,species,product_type,unit\n2020,1,North,Pine,Sawtimber,$/ton\n",
    );
    let err = load_source(&builtin("LA"), dir.path()).unwrap_err();
    assert!(matches!(err, IngestError::MissingColumn { ref column, .. } if column == "price"));
}

#[test]
fn texas_prefers_normalized_product_column() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(
        dir.path(),
        "texas_am/tx_stumpage_parsed.csv",
        "year,region,species,product_type,product_type_normalized,price_avg,unit\n\
         2019,East,Pine,Pine Sawlogs,sawtimber,30.1,$/ton\n",
    );
    let output = load_source(&builtin("TX"), dir.path()).expect("load");
    assert_eq!(output.records[0].product_type.as_deref(), Some("sawtimber"));
}

#[test]
fn sales_are_aggregated_per_year_and_type() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(
        dir.path(),
        "tn_forestry/tn_state_forest_sales.csv",
        "fiscal_year,calendar_year,sale_id,state_forest,timber_type,volume_mbf,winning_bid,price_per_mbf\n\
         2023,2023,A-1,Franklin,hardwood,485.89,195347.70,402.04\n\
         2023,2023,A-2,Natchez Trace,pine,703.48,151160.00,214.88\n\
         2023,2023,A-3,Natchez Trace,pine,442.21,67999.00,153.78\n",
    );
    let output = load_source(&builtin("TN"), dir.path()).expect("load");
    assert_eq!(output.records.len(), 2);
    let hardwood = &output.records[0];
    assert_eq!(hardwood.species.as_deref(), Some("mixed_hardwood"));
    assert_eq!(hardwood.sample_size, Some(1));
    let pine = &output.records[1];
    assert_eq!(pine.species.as_deref(), Some("southern_pine"));
    assert_eq!(pine.region.as_deref(), Some("Tennessee"));
    assert_eq!(pine.price_avg, Some(184.33));
    assert_eq!(pine.price_low, Some(153.78));
    assert_eq!(pine.price_high, Some(214.88));
    assert_eq!(pine.sample_size, Some(2));
    assert_eq!(
        pine.notes.as_deref(),
        Some("TN State Forest timber sales (FY 2023). Doyle Rule. Calculated from winning bids.")
    );
}

#[test]
fn usfs_rows_fan_out_to_state_codes() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(
        dir.path(),
        "usfs_pnw/usfs_pnw_stumpage_combined.csv",
        "year,region,subregion,price_per_mbf,table\n\
         2005,Washington_Oregon,Washington_Oregon,210.5,Table 2\n\
         2005,Washington_Oregon,Oregon,190.0,Table 2\n\
         2006,Montana_Idaho,Idaho,,Table 2\n",
    );
    write(
        dir.path(),
        "usfs_pnw/usfs_pnw_species_stumpage.csv",
        "year,region,species,price_per_mbf,table\n\
         2005,Pacific_Northwest_WA_OR,Douglas-fir,305.0,Table 7\n\
         2005,Pacific_Northwest_WA_OR,Douglas-fir,310.0,Table 8\n",
    );
    let output = load_source(&builtin("USFS_PNW"), dir.path()).expect("load");
    assert_eq!(output.skipped, 1);
    assert_eq!(output.records.len(), 3);

    let statewide = &output.records[0];
    assert_eq!(statewide.source, "WA_OR");
    assert_eq!(statewide.region.as_deref(), Some("Statewide"));
    assert_eq!(statewide.species.as_deref(), Some("all_species"));
    assert_eq!(
        statewide.notes.as_deref(),
        Some("USFS PNW National Forest stumpage. Table 2. Administered pricing, not market.")
    );

    assert_eq!(output.records[1].source, "OR");
    assert_eq!(output.records[1].region.as_deref(), Some("Oregon"));

    let species = &output.records[2];
    assert_eq!(species.source, "WA_OR");
    assert_eq!(species.region.as_deref(), Some("Pacific Northwest WA OR"));
    assert_eq!(species.species.as_deref(), Some("douglas_fir"));
    assert_eq!(species.price_avg, Some(310.0));
}
