//! Conversion of reported prices to $/ton.
//!
//! The factor depends only on the record's unit and species label, and the
//! converted price only on the factor and `price_avg`, so converting a record
//! twice yields the same record.

use std::ops::AddAssign;

use serde::Serialize;
use tracing::debug;

use stumpage_model::{CanonicalRecord, PriceUnit};
use stumpage_standards::{FactorUnit, factor_for_species};

/// Tons per unit of volume for `unit`, or `None` when no physical
/// conversion exists.
pub fn tons_per_unit(unit: PriceUnit, species: Option<&str>) -> Option<f64> {
    match unit {
        PriceUnit::PerTon => Some(1.0),
        PriceUnit::PerCord => Some(factor_for_species(FactorUnit::Cord, species).factor),
        PriceUnit::PerMbf => Some(factor_for_species(FactorUnit::Mbf, species).factor),
        PriceUnit::Index => None,
    }
}

/// Fills `conversion_factor` and `price_per_ton` from the unit, species
/// and `price_avg`. Unrecognized units and index values clear both.
pub fn convert_record(mut record: CanonicalRecord) -> CanonicalRecord {
    let unit = record.price_unit();
    let factor = unit.and_then(|unit| tons_per_unit(unit, record.species.as_deref()));
    record.conversion_factor = factor;
    record.price_per_ton = match (unit, factor, record.price_avg) {
        (Some(PriceUnit::PerTon), _, price) => price,
        (_, Some(factor), Some(price)) => Some(price / factor),
        _ => None,
    };
    record
}

/// Counts gathered while converting a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub records: usize,
    /// Records with a reported `price_avg`.
    pub with_price: usize,
    /// Records that received a `price_per_ton`.
    pub converted: usize,
    pub index_values: usize,
    /// Priced records whose unit has no conversion.
    pub unconvertible: usize,
}

impl ConversionStats {
    /// Share of priced records that were converted, in percent.
    pub fn success_rate(&self) -> f64 {
        if self.with_price == 0 {
            0.0
        } else {
            self.converted as f64 * 100.0 / self.with_price as f64
        }
    }

    fn observe(&mut self, record: &CanonicalRecord) {
        self.records += 1;
        if record.price_unit() == Some(PriceUnit::Index) {
            self.index_values += 1;
        }
        if record.has_price() {
            self.with_price += 1;
            if record.price_per_ton.is_some() {
                self.converted += 1;
            } else if record.price_unit() != Some(PriceUnit::Index) {
                self.unconvertible += 1;
            }
        }
    }
}

impl AddAssign for ConversionStats {
    fn add_assign(&mut self, other: Self) {
        self.records += other.records;
        self.with_price += other.with_price;
        self.converted += other.converted;
        self.index_values += other.index_values;
        self.unconvertible += other.unconvertible;
    }
}

/// Converts every record and tallies the outcome.
pub fn convert_records(records: Vec<CanonicalRecord>) -> (Vec<CanonicalRecord>, ConversionStats) {
    let mut stats = ConversionStats::default();
    let converted: Vec<CanonicalRecord> = records
        .into_iter()
        .map(|record| {
            let record = convert_record(record);
            stats.observe(&record);
            record
        })
        .collect();
    debug!(
        record_count = stats.records,
        converted = stats.converted,
        unconvertible = stats.unconvertible,
        "prices converted"
    );
    (converted, stats)
}

#[cfg(test)]
mod tests {
    use stumpage_model::PeriodType;

    use super::*;

    fn priced(unit: &str, species: &str, price: f64) -> CanonicalRecord {
        let mut record = CanonicalRecord::new("XX", 2023, PeriodType::Annual);
        record.unit = Some(unit.to_string());
        record.species = Some(species.to_string());
        record.price_avg = Some(price);
        record
    }

    #[test]
    fn cord_price_uses_species_group() {
        let record = convert_record(priced("$/cord", "Loblolly Pine", 53.40));
        assert_eq!(record.conversion_factor, Some(2.67));
        let per_ton = record.price_per_ton.unwrap();
        assert!((per_ton - 20.0).abs() < 0.01);
    }

    #[test]
    fn ton_price_is_kept() {
        let record = convert_record(priced("$/ton", "Mixed", 12.34));
        assert_eq!(record.conversion_factor, Some(1.0));
        assert_eq!(record.price_per_ton, Some(12.34));
    }

    #[test]
    fn factor_without_price() {
        let mut record = priced("$/mbf", "Red Oak", 0.0);
        record.price_avg = None;
        let record = convert_record(record);
        assert_eq!(record.conversion_factor, Some(8.5));
        assert_eq!(record.price_per_ton, None);
    }

    #[test]
    fn index_and_unknown_units_are_not_converted() {
        for unit in ["index", "$/bushel"] {
            let record = convert_record(priced(unit, "Pine", 110.0));
            assert_eq!(record.conversion_factor, None);
            assert_eq!(record.price_per_ton, None);
        }
    }

    #[test]
    fn stats_count_outcomes() {
        let (_, stats) = convert_records(vec![
            priced("$/ton", "Pine", 10.0),
            priced("index", "Pine", 100.0),
            priced("$/bushel", "Pine", 3.0),
            CanonicalRecord::new("XX", 2023, PeriodType::Annual),
        ]);
        assert_eq!(stats.records, 4);
        assert_eq!(stats.with_price, 3);
        assert_eq!(stats.converted, 1);
        assert_eq!(stats.index_values, 1);
        assert_eq!(stats.unconvertible, 1);
        assert!((stats.success_rate() - 33.333).abs() < 0.01);
    }
}
