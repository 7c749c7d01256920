//! Built-in source configurations.
//!
//! Sixteen agencies publish pre-parsed CSV tables; three more sources need
//! document classification, sale aggregation, or the national forest feed.

use std::collections::BTreeMap;
use std::path::PathBuf;

use stumpage_model::{MergePolicy, PeriodType};

use crate::classify::ClassifierConfig;
use crate::config::{
    DocumentSource, FieldMapping, FieldSource, SalesSource, SourceConfig, SourceInput, TableSource,
    UsfsSource,
};
use crate::period::Season;

/// The default mapping: `year`, `region`, `species`, `product_type` and
/// `unit` columns, everything else absent.
fn base_fields() -> FieldMapping {
    FieldMapping {
        year: FieldSource::column("year"),
        region: FieldSource::column("region"),
        species: FieldSource::column("species"),
        product_type: FieldSource::column("product_type"),
        unit: FieldSource::column("unit"),
        ..FieldMapping::default()
    }
}

fn quarterly(mut fields: FieldMapping) -> FieldMapping {
    fields.quarter = FieldSource::column("quarter");
    fields
}

fn table(
    code: &str,
    name: &str,
    agency_dir: &str,
    period_type: PeriodType,
    fields: FieldMapping,
) -> SourceConfig {
    let file = format!("{}_stumpage_parsed.csv", code.to_lowercase());
    SourceConfig {
        code: code.to_string(),
        name: name.to_string(),
        merge: MergePolicy::Rebuild,
        input: SourceInput::Table(TableSource {
            path: PathBuf::from(agency_dir).join(file),
            period_type,
            fields,
        }),
    }
}

/// Average price with optional low/high bounds.
fn ranged(mut fields: FieldMapping) -> FieldMapping {
    fields.price_avg = FieldSource::column("price_avg");
    fields.price_low = FieldSource::optional("price_low");
    fields.price_high = FieldSource::optional("price_high");
    fields
}

fn michigan() -> SourceConfig {
    let fields = FieldMapping {
        year: FieldSource::column("year"),
        quarter: FieldSource::column("quarter"),
        region: FieldSource::column("market_area"),
        species: FieldSource::column("species_group"),
        product_type: FieldSource::lookup(
            "product",
            &[("SAW", "sawtimber"), ("PULP", "pulpwood")],
            Some("total_index"),
        ),
        price_avg: FieldSource::column("avg_bid_index"),
        unit: FieldSource::constant("index"),
        sample_size: FieldSource::column("volume"),
        notes: FieldSource::constant("Price index (base=100), not actual price"),
        ..FieldMapping::default()
    };
    table("MI", "Michigan DNR", "mi_dnr", PeriodType::Quarterly, fields)
}

fn minnesota() -> SourceConfig {
    let fields = FieldMapping {
        region: FieldSource::constant("Statewide"),
        price_avg: FieldSource::column("price"),
        ..base_fields()
    };
    table("MN", "Minnesota DNR", "mn_dnr", PeriodType::Annual, fields)
}

fn wisconsin() -> SourceConfig {
    let fields = FieldMapping {
        region: FieldSource::Format {
            column: "zone".to_string(),
            template: "Zone {}".to_string(),
            digits_only: true,
        },
        price_avg: FieldSource::column("price"),
        unit: FieldSource::constant("$/cord"),
        notes: FieldSource::format("program", "Program: {}"),
        ..base_fields()
    };
    table("WI", "Wisconsin DNR", "wi_dnr", PeriodType::Annual, fields)
}

fn new_york() -> SourceConfig {
    let seasons: Vec<(String, String)> = Season::ALL
        .iter()
        .map(|season| (season.as_str().to_lowercase(), season.quarter().to_string()))
        .collect();
    let fields = FieldMapping {
        quarter: FieldSource::Lookup {
            column: "season".to_string(),
            entries: seasons.into_iter().collect::<BTreeMap<_, _>>(),
            default: None,
        },
        price_avg: FieldSource::column("price_avg_median"),
        price_low: FieldSource::column("price_low_median"),
        price_high: FieldSource::column("price_high_median"),
        notes: FieldSource::format("log_rule", "Log rule: {}"),
        ..base_fields()
    };
    table("NY", "New York DEC", "ny_dec", PeriodType::SemiAnnual, fields)
}

fn pennsylvania() -> SourceConfig {
    let fields = FieldMapping {
        price_avg: FieldSource::column("price_avg"),
        price_low: FieldSource::column("price_low"),
        price_high: FieldSource::column("price_high"),
        sample_size: FieldSource::column("sample_size"),
        ..quarterly(base_fields())
    };
    table("PA", "Penn State Extension", "pa_extension", PeriodType::Quarterly, fields)
}

fn vermont() -> SourceConfig {
    let fields = FieldMapping {
        price_avg: FieldSource::column("price"),
        sample_size: FieldSource::column("sample_size"),
        ..quarterly(base_fields())
    };
    table("VT", "Vermont FPR", "vt_fpr", PeriodType::Quarterly, fields)
}

fn maine() -> SourceConfig {
    let fields = FieldMapping {
        price_avg: FieldSource::column("price_avg"),
        price_low: FieldSource::column("price_min"),
        price_high: FieldSource::column("price_max"),
        sample_size: FieldSource::column("num_reports"),
        ..base_fields()
    };
    table("ME", "Maine Forest Service", "me_forest_service", PeriodType::Annual, fields)
}

fn georgia() -> SourceConfig {
    let fields = FieldMapping {
        region: FieldSource::constant("Statewide"),
        county: FieldSource::column("county"),
        price_avg: FieldSource::column("price_avg"),
        notes: FieldSource::constant("County-level fair market values"),
        ..base_fields()
    };
    table("GA", "Georgia DOR", "ga_dor", PeriodType::Annual, fields)
}

fn louisiana() -> SourceConfig {
    let fields = FieldMapping {
        price_avg: FieldSource::column("price"),
        ..quarterly(base_fields())
    };
    table("LA", "Louisiana Forestry", "la_forestry", PeriodType::Quarterly, fields)
}

fn texas() -> SourceConfig {
    let fields = FieldMapping {
        product_type: FieldSource::first_of(&["product_type_normalized", "product_type"]),
        price_avg: FieldSource::column("price_avg"),
        ..base_fields()
    };
    table("TX", "Texas A&M Forest Service", "texas_am", PeriodType::Annual, fields)
}

fn west_virginia() -> SourceConfig {
    let mut fields = ranged(base_fields());
    fields.sample_size = FieldSource::optional("num_reports");
    table("WV", "West Virginia Forestry", "wv_forestry", PeriodType::Annual, fields)
}

fn new_hampshire() -> SourceConfig {
    SourceConfig {
        code: "NH".to_string(),
        name: "New Hampshire DRA".to_string(),
        merge: MergePolicy::Rebuild,
        input: SourceInput::Documents(DocumentSource {
            dir: PathBuf::from("nh_dra/extracted"),
            period_type: PeriodType::SemiAnnual,
            default_region: "Unknown".to_string(),
            derive_midpoint: true,
            classifier: ClassifierConfig::default(),
        }),
    }
}

fn tennessee() -> SourceConfig {
    let species_by_type = [("hardwood", "mixed_hardwood"), ("pine", "southern_pine")]
        .into_iter()
        .map(|(timber_type, species)| (timber_type.to_string(), species.to_string()))
        .collect();
    SourceConfig {
        code: "TN".to_string(),
        name: "Tennessee State Forests".to_string(),
        merge: MergePolicy::MergeByYear,
        input: SourceInput::Sales(SalesSource {
            path: PathBuf::from("tn_forestry/tn_state_forest_sales.csv"),
            region: "Tennessee".to_string(),
            product_type: "sawtimber".to_string(),
            unit: "$/mbf".to_string(),
            notes: "TN State Forest timber sales (FY {year}). Doyle Rule. Calculated from winning bids."
                .to_string(),
            species_by_type,
            default_species: "mixed".to_string(),
        }),
    }
}

fn usfs_pnw() -> SourceConfig {
    SourceConfig {
        code: "USFS_PNW".to_string(),
        name: "USFS PNW Research Station".to_string(),
        merge: MergePolicy::ReplaceMarked {
            marker: "USFS PNW".to_string(),
        },
        input: SourceInput::Usfs(UsfsSource {
            combined_path: PathBuf::from("usfs_pnw/usfs_pnw_stumpage_combined.csv"),
            species_path: PathBuf::from("usfs_pnw/usfs_pnw_species_stumpage.csv"),
            marker: "USFS PNW".to_string(),
        }),
    }
}

/// Every built-in source in run order.
pub fn builtin_sources() -> Vec<SourceConfig> {
    vec![
        michigan(),
        minnesota(),
        wisconsin(),
        new_york(),
        pennsylvania(),
        vermont(),
        maine(),
        table(
            "AL",
            "Alabama Forestry Commission",
            "al_forestry",
            PeriodType::Annual,
            ranged(base_fields()),
        ),
        table(
            "AR",
            "Arkansas Extension",
            "ar_extension",
            PeriodType::Quarterly,
            ranged(quarterly(base_fields())),
        ),
        table(
            "FL",
            "Florida IFAS",
            "fl_ifas",
            PeriodType::Quarterly,
            ranged(quarterly(base_fields())),
        ),
        georgia(),
        louisiana(),
        table(
            "MS",
            "Mississippi Extension",
            "ms_extension",
            PeriodType::Quarterly,
            ranged(quarterly(base_fields())),
        ),
        table(
            "SC",
            "South Carolina Forestry Commission",
            "sc_forestry",
            PeriodType::Quarterly,
            ranged(quarterly(base_fields())),
        ),
        texas(),
        west_virginia(),
        new_hampshire(),
        tennessee(),
        usfs_pnw(),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn codes_are_unique() {
        let sources = builtin_sources();
        let codes: BTreeSet<&str> = sources.iter().map(|source| source.code.as_str()).collect();
        assert_eq!(codes.len(), sources.len());
        assert_eq!(
            sources
                .iter()
                .filter(|source| source.input.kind() == "table")
                .count(),
            16
        );
    }

    #[test]
    fn table_paths_follow_agency_layout() {
        let sources = builtin_sources();
        let ga = sources.iter().find(|source| source.code == "GA").unwrap();
        assert_eq!(
            ga.input.location(),
            PathBuf::from("ga_dor/ga_stumpage_parsed.csv").as_path()
        );
    }
}
