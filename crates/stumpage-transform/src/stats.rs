//! Descriptive statistics over a unified dataset.

use std::collections::BTreeMap;

use serde::Serialize;

use stumpage_model::CanonicalRecord;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearSpan {
    pub first: i32,
    pub last: i32,
}

impl YearSpan {
    fn widen(span: Option<YearSpan>, year: i32) -> YearSpan {
        match span {
            Some(span) => YearSpan {
                first: span.first.min(year),
                last: span.last.max(year),
            },
            None => YearSpan {
                first: year,
                last: year,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceCoverage {
    pub records: usize,
    pub years: YearSpan,
}

/// $/ton distribution for a group of converted records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl PriceSummary {
    fn from_values(mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 0 {
            (values[count / 2 - 1] + values[count / 2]) / 2.0
        } else {
            values[count / 2]
        };
        Some(Self {
            count,
            mean,
            median,
            min: values[0],
            max: values[count - 1],
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetStats {
    pub records: usize,
    pub with_price: usize,
    pub converted: usize,
    pub years: Option<YearSpan>,
    pub by_source: BTreeMap<String, SourceCoverage>,
    pub by_unit: BTreeMap<String, usize>,
    pub by_product: BTreeMap<String, usize>,
    pub price_per_ton: Option<PriceSummary>,
    pub price_per_ton_by_product: BTreeMap<String, PriceSummary>,
}

impl DatasetStats {
    pub fn from_records(records: &[CanonicalRecord]) -> Self {
        let mut stats = DatasetStats {
            records: records.len(),
            ..DatasetStats::default()
        };
        let mut all_prices = Vec::new();
        let mut product_prices: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for record in records {
            stats.years = Some(YearSpan::widen(stats.years, record.year));
            stats
                .by_source
                .entry(record.source.clone())
                .and_modify(|coverage| {
                    coverage.records += 1;
                    coverage.years = YearSpan::widen(Some(coverage.years), record.year);
                })
                .or_insert_with(|| SourceCoverage {
                    records: 1,
                    years: YearSpan::widen(None, record.year),
                });
            if let Some(unit) = &record.unit {
                *stats.by_unit.entry(unit.clone()).or_default() += 1;
            }
            if let Some(product) = &record.product_type {
                *stats.by_product.entry(product.clone()).or_default() += 1;
            }
            if record.has_price() {
                stats.with_price += 1;
            }
            if let Some(price) = record.price_per_ton {
                stats.converted += 1;
                all_prices.push(price);
                if let Some(product) = &record.product_type {
                    product_prices.entry(product.clone()).or_default().push(price);
                }
            }
        }
        stats.price_per_ton = PriceSummary::from_values(all_prices);
        stats.price_per_ton_by_product = product_prices
            .into_iter()
            .filter_map(|(product, prices)| {
                PriceSummary::from_values(prices).map(|summary| (product, summary))
            })
            .collect();
        stats
    }

    /// Share of priced records carrying a $/ton price, in percent.
    pub fn conversion_rate(&self) -> f64 {
        if self.with_price == 0 {
            0.0
        } else {
            self.converted as f64 * 100.0 / self.with_price as f64
        }
    }
}
