//! Heuristic row classification for tables extracted from price reports.
//!
//! A table is scanned once. Rows before the header are ignored; after it,
//! each row is either noise, a section marker that updates the
//! [`SectionContext`], or a data row interpreted positionally by arity.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use stumpage_model::{ClassifiedRow, RawTable, RawTableRow, SectionContext};

use crate::parse::parse_price;

/// A keyword that marks a region section, and the label recorded for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionLabel {
    pub keyword: String,
    pub label: String,
}

/// Keyword sets driving the classifier. All keywords are upper-case and
/// matched as substrings of upper-cased cell text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub header_keywords: Vec<String>,
    pub reject_keywords: Vec<String>,
    /// Checked in order; when page text names several regions the last wins.
    pub region_labels: Vec<RegionLabel>,
    pub species_labels: Vec<String>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|word| (*word).to_string()).collect()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            header_keywords: owned(&["SPECIES", "PRODUCT", "LOW", "HIGH"]),
            reject_keywords: owned(&["SPECIES", "PRODUCT", "AVERAGE", "RANGE", "TYPE", "TOTAL"]),
            region_labels: [
                ("NORTHERN", "Northern"),
                ("CENTRAL", "Central"),
                ("SOUTHERN", "Southern"),
            ]
            .into_iter()
            .map(|(keyword, label)| RegionLabel {
                keyword: keyword.to_string(),
                label: label.to_string(),
            })
            .collect(),
            species_labels: owned(&["PINE", "HARDWOOD", "SOFTWOOD"]),
        }
    }
}

impl ClassifierConfig {
    /// Region named by free page text; later labels override earlier ones.
    pub fn region_in_text(&self, text: &str) -> Option<String> {
        let upper = text.to_uppercase();
        self.region_labels
            .iter()
            .rev()
            .find(|region| upper.contains(&region.keyword))
            .map(|region| region.label.clone())
    }

    fn region_in_cell(&self, upper: &str) -> Option<&str> {
        self.region_labels
            .iter()
            .find(|region| upper.contains(&region.keyword))
            .map(|region| region.label.as_str())
    }

    fn is_header_row(&self, row: &RawTableRow) -> bool {
        row.non_empty_cells().any(|cell| {
            let upper = cell.to_uppercase();
            self.header_keywords
                .iter()
                .any(|keyword| upper.contains(keyword))
        })
    }
}

/// Positional cells of a data row before context is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataCells {
    pub species: Option<String>,
    pub product: Option<String>,
    pub price_low: Option<f64>,
    pub price_high: Option<f64>,
    pub unit: Option<String>,
}

/// What a single post-header row turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    Blank,
    Rejected,
    Region(String),
    SpeciesLabel(String),
    ProductLabel(String),
    /// Fewer than three cells and not a label.
    TooShort,
    /// Neither price bound parsed.
    NoPrice,
    Data(DataCells),
}

/// Classifies one row in isolation.
pub fn classify_row(row: &RawTableRow, config: &ClassifierConfig) -> RowKind {
    let Some(first) = row.non_empty_cells().next() else {
        return RowKind::Blank;
    };
    let upper = first.to_uppercase();
    // A region word only marks a section on a row without prices; species
    // such as "Southern Pine" stay data.
    if let Some(label) = config.region_in_cell(&upper)
        && !row
            .non_empty_cells()
            .skip(1)
            .any(|cell| parse_price(cell).is_some())
    {
        return RowKind::Region(label.to_string());
    }
    if config
        .reject_keywords
        .iter()
        .any(|keyword| upper.contains(keyword))
    {
        return RowKind::Rejected;
    }
    if row.non_empty_cells().count() == 1 && parse_price(first).is_none() {
        let label = first.to_string();
        return if config
            .species_labels
            .iter()
            .any(|keyword| upper.contains(keyword))
        {
            RowKind::SpeciesLabel(label)
        } else {
            RowKind::ProductLabel(label)
        };
    }

    let text = |index: usize| row.cell(index).map(str::to_string);
    let price = |index: usize| row.cell(index).and_then(parse_price);
    let cells = match row.len() {
        0..=2 => return RowKind::TooShort,
        3 => DataCells {
            species: text(0),
            product: None,
            price_low: price(1),
            price_high: price(2),
            unit: None,
        },
        4 => DataCells {
            species: text(0),
            product: None,
            price_low: price(1),
            price_high: price(2),
            unit: text(3),
        },
        _ => DataCells {
            species: text(0),
            product: text(1),
            price_low: price(2),
            price_high: price(3),
            unit: text(4),
        },
    };
    if cells.price_low.is_none() && cells.price_high.is_none() {
        return RowKind::NoPrice;
    }
    RowKind::Data(cells)
}

/// Applies one classified row to the running context, emitting a data row
/// when the row carries prices and a species can be resolved.
fn step(
    mut context: SectionContext,
    kind: RowKind,
) -> (SectionContext, Option<ClassifiedRow>) {
    match kind {
        RowKind::Region(label) => {
            context.current_region = Some(label);
            (context, None)
        }
        RowKind::SpeciesLabel(label) => {
            context.current_species = Some(label);
            context.current_product = None;
            (context, None)
        }
        RowKind::ProductLabel(label) => {
            context.current_product = Some(label);
            (context, None)
        }
        RowKind::Data(cells) => {
            let species = cells.species.or_else(|| context.current_species.clone());
            let Some(species) = species else {
                trace!("data row without species dropped");
                return (context, None);
            };
            let row = ClassifiedRow {
                region: context.current_region.clone(),
                species: Some(species),
                product: cells.product.or_else(|| context.current_product.clone()),
                price_low: cells.price_low,
                price_high: cells.price_high,
                unit: cells.unit,
            };
            (context, Some(row))
        }
        RowKind::Blank | RowKind::Rejected | RowKind::TooShort | RowKind::NoPrice => {
            (context, None)
        }
    }
}

/// Scans one table and returns the section state left after its last row,
/// so callers can carry it into the next table.
///
/// Tables without a recognizable header yield nothing and leave `context`
/// unchanged.
pub fn scan_table(
    table: &RawTable,
    context: SectionContext,
    config: &ClassifierConfig,
) -> (SectionContext, Vec<ClassifiedRow>) {
    let rows = table.rows();
    let Some(header_index) = rows.iter().position(|row| config.is_header_row(row)) else {
        debug!(row_count = rows.len(), "table rejected: no header row");
        return (context, Vec::new());
    };
    let (context, classified) = rows[header_index + 1..].iter().fold(
        (context, Vec::new()),
        |(context, mut classified), row| {
            let (context, emitted) = step(context, classify_row(row, config));
            classified.extend(emitted);
            (context, classified)
        },
    );
    trace!(
        header_index,
        data_rows = classified.len(),
        "table classified"
    );
    (context, classified)
}

/// Extracts data rows from a table, threading section state from `seed`.
pub fn classify_table(
    table: &RawTable,
    seed: SectionContext,
    config: &ClassifierConfig,
) -> Vec<ClassifiedRow> {
    scan_table(table, seed, config).1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> RawTableRow {
        cells
            .iter()
            .map(|cell| (!cell.is_empty()).then_some(*cell))
            .collect()
    }

    #[test]
    fn arity_five_reads_product_and_unit() {
        let kind = classify_row(
            &row(&["White Oak", "Sawlogs", "250.00", "350.00", "MBF"]),
            &ClassifierConfig::default(),
        );
        assert_eq!(
            kind,
            RowKind::Data(DataCells {
                species: Some("White Oak".to_string()),
                product: Some("Sawlogs".to_string()),
                price_low: Some(250.0),
                price_high: Some(350.0),
                unit: Some("MBF".to_string()),
            })
        );
    }

    #[test]
    fn arity_four_and_three_drop_product() {
        let config = ClassifierConfig::default();
        let RowKind::Data(four) = classify_row(&row(&["Hemlock", "$40", "$60", "MBF"]), &config)
        else {
            panic!("expected data row");
        };
        assert_eq!(four.product, None);
        assert_eq!(four.unit.as_deref(), Some("MBF"));

        let RowKind::Data(three) = classify_row(&row(&["Aspen", "", "18"]), &config) else {
            panic!("expected data row");
        };
        assert_eq!(three.price_low, None);
        assert_eq!(three.price_high, Some(18.0));
        assert_eq!(three.unit, None);
    }

    #[test]
    fn markers_and_noise() {
        let config = ClassifierConfig::default();
        assert_eq!(
            classify_row(&row(&["NORTHERN REGION", "", ""]), &config),
            RowKind::Region("Northern".to_string())
        );
        assert_eq!(
            classify_row(&row(&["Total", "1", "2"]), &config),
            RowKind::Rejected
        );
        assert_eq!(
            classify_row(&row(&["HARDWOOD", "", "", ""]), &config),
            RowKind::SpeciesLabel("HARDWOOD".to_string())
        );
        assert_eq!(
            classify_row(&row(&["Pulpwood"]), &config),
            RowKind::ProductLabel("Pulpwood".to_string())
        );
        assert_eq!(classify_row(&row(&["Ash", "12"]), &config), RowKind::TooShort);
        assert_eq!(
            classify_row(&row(&["Ash", "call", "office"]), &config),
            RowKind::NoPrice
        );
        assert_eq!(classify_row(&row(&["", " "]), &config), RowKind::Blank);
    }

    #[test]
    fn region_word_in_priced_row_is_data() {
        let config = ClassifierConfig::default();
        let RowKind::Data(cells) = classify_row(&row(&["Southern Pine", "30", "40"]), &config)
        else {
            panic!("expected data row");
        };
        assert_eq!(cells.species.as_deref(), Some("Southern Pine"));
        assert_eq!(cells.price_low, Some(30.0));
        assert_eq!(
            classify_row(&row(&["Central Hardwoods", "n/a", ""]), &config),
            RowKind::Region("Central".to_string())
        );
    }

    #[test]
    fn page_text_region_last_match_wins() {
        let config = ClassifierConfig::default();
        assert_eq!(
            config.region_in_text("Northern and Southern zones"),
            Some("Southern".to_string())
        );
        assert_eq!(config.region_in_text("statewide"), None);
    }
}
