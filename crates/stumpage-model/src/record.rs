//! The canonical stumpage price record.

use serde::{Deserialize, Deserializer, Serialize};

use crate::enums::{PeriodType, PriceUnit};

/// Output column order of the unified dataset.
pub const UNIFIED_COLUMNS: [&str; 16] = [
    "source",
    "year",
    "quarter",
    "period_type",
    "region",
    "county",
    "species",
    "product_type",
    "price_avg",
    "price_low",
    "price_high",
    "unit",
    "price_per_ton",
    "conversion_factor",
    "sample_size",
    "notes",
];

/// One harmonized stumpage price observation.
///
/// Adapters create records with the derived fields (`price_per_ton`,
/// `conversion_factor`) empty; the converter fills them once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub source: String,
    pub year: i32,
    #[serde(default, deserialize_with = "lenient_quarter")]
    pub quarter: Option<u8>,
    pub period_type: PeriodType,
    pub region: Option<String>,
    pub county: Option<String>,
    pub species: Option<String>,
    pub product_type: Option<String>,
    pub price_avg: Option<f64>,
    pub price_low: Option<f64>,
    pub price_high: Option<f64>,
    pub unit: Option<String>,
    pub price_per_ton: Option<f64>,
    pub conversion_factor: Option<f64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub sample_size: Option<i64>,
    pub notes: Option<String>,
}

/// Deduplication key: one surviving record per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub source: String,
    pub year: i32,
    pub quarter: Option<u8>,
    pub region: Option<String>,
    pub species: Option<String>,
    pub product_type: Option<String>,
}

impl CanonicalRecord {
    pub fn new(source: impl Into<String>, year: i32, period_type: PeriodType) -> Self {
        Self {
            source: source.into(),
            year,
            quarter: None,
            period_type,
            region: None,
            county: None,
            species: None,
            product_type: None,
            price_avg: None,
            price_low: None,
            price_high: None,
            unit: None,
            price_per_ton: None,
            conversion_factor: None,
            sample_size: None,
            notes: None,
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            source: self.source.clone(),
            year: self.year,
            quarter: self.quarter,
            region: self.region.clone(),
            species: self.species.clone(),
            product_type: self.product_type.clone(),
        }
    }

    /// Number of non-null reported price fields (avg, low, high).
    pub fn price_field_count(&self) -> usize {
        [self.price_avg, self.price_low, self.price_high]
            .iter()
            .filter(|value| value.is_some())
            .count()
    }

    pub fn has_price(&self) -> bool {
        self.price_avg.is_some()
    }

    /// Canonical unit if the `unit` string is one the converter understands.
    pub fn price_unit(&self) -> Option<PriceUnit> {
        self.unit.as_deref().and_then(|unit| unit.parse().ok())
    }
}

// Older unified files carry float-typed integer columns ("2.0").
fn lenient_quarter<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = Option::deserialize(deserializer)?;
    Ok(value
        .filter(|v| v.fract() == 0.0 && (1.0..=4.0).contains(v))
        .map(|v| v as u8))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = Option::deserialize(deserializer)?;
    Ok(value.filter(|v| v.is_finite()).map(|v| v.round() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_field_count_counts_reported_fields() {
        let mut record = CanonicalRecord::new("AL", 2023, PeriodType::Annual);
        assert_eq!(record.price_field_count(), 0);
        record.price_avg = Some(30.0);
        record.price_high = Some(40.0);
        assert_eq!(record.price_field_count(), 2);
    }

    #[test]
    fn price_unit_ignores_passthrough_units() {
        let mut record = CanonicalRecord::new("MI", 2023, PeriodType::Quarterly);
        record.unit = Some("index".to_string());
        assert_eq!(record.price_unit(), Some(PriceUnit::Index));
        record.unit = Some("$/bushel".to_string());
        assert_eq!(record.price_unit(), None);
    }
}
