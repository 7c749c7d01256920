//! Key-based deduplication: one record per
//! (source, year, quarter, region, species, product type).

use std::cmp::Ordering;
use std::collections::HashSet;

use stumpage_model::CanonicalRecord;

fn cmp_price(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        _ => b.is_some().cmp(&a.is_some()),
    }
}

/// Total order used to pick the survivor of a key: more price fields first,
/// then a fixed comparison of every remaining field.
fn precedence(a: &CanonicalRecord, b: &CanonicalRecord) -> Ordering {
    b.price_field_count()
        .cmp(&a.price_field_count())
        .then_with(|| cmp_price(a.price_avg, b.price_avg))
        .then_with(|| cmp_price(a.price_low, b.price_low))
        .then_with(|| cmp_price(a.price_high, b.price_high))
        .then_with(|| cmp_price(a.price_per_ton, b.price_per_ton))
        .then_with(|| cmp_price(a.conversion_factor, b.conversion_factor))
        .then_with(|| a.unit.cmp(&b.unit))
        .then_with(|| a.notes.cmp(&b.notes))
        .then_with(|| a.county.cmp(&b.county))
        .then_with(|| a.sample_size.cmp(&b.sample_size))
        .then_with(|| a.period_type.as_str().cmp(b.period_type.as_str()))
}

/// Keeps the most complete record for each key.
///
/// Records are ranked by their number of reported price fields (descending),
/// ties broken by [`precedence`], and the first record per key survives, so
/// the survivor does not depend on input order. Survivors keep their input
/// order. Returns the survivors and the number of records dropped.
pub fn deduplicate(records: Vec<CanonicalRecord>) -> (Vec<CanonicalRecord>, usize) {
    let total = records.len();
    let mut ranked: Vec<(usize, CanonicalRecord)> = records.into_iter().enumerate().collect();
    ranked.sort_by(|(_, a), (_, b)| precedence(a, b));

    let mut seen = HashSet::with_capacity(total);
    let mut kept: Vec<(usize, CanonicalRecord)> = ranked
        .into_iter()
        .filter(|(_, record)| seen.insert(record.key()))
        .collect();
    kept.sort_by_key(|(index, _)| *index);

    let survivors: Vec<CanonicalRecord> = kept.into_iter().map(|(_, record)| record).collect();
    let dropped = total - survivors.len();
    (survivors, dropped)
}
