//! DataFrame construction for the unified dataset.

use polars::prelude::{Column, DataFrame, NamedFrom, Series};

use stumpage_model::{CanonicalRecord, UNIFIED_COLUMNS};

use crate::error::{Result, TransformError};

fn text_column(name: &str, values: Vec<Option<String>>) -> Column {
    Series::new(name.into(), values).into()
}

fn float_column(name: &str, values: Vec<Option<f64>>) -> Column {
    Series::new(name.into(), values).into()
}

/// Builds a frame with one typed column per unified field, in output order.
pub fn build_unified_frame(records: &[CanonicalRecord]) -> Result<DataFrame> {
    let texts = |field: fn(&CanonicalRecord) -> Option<&str>| -> Vec<Option<String>> {
        records
            .iter()
            .map(|record| field(record).map(str::to_string))
            .collect()
    };
    let floats = |field: fn(&CanonicalRecord) -> Option<f64>| -> Vec<Option<f64>> {
        records.iter().map(field).collect()
    };

    let [
        source,
        year,
        quarter,
        period_type,
        region,
        county,
        species,
        product_type,
        price_avg,
        price_low,
        price_high,
        unit,
        price_per_ton,
        conversion_factor,
        sample_size,
        notes,
    ] = UNIFIED_COLUMNS;

    let columns: Vec<Column> = vec![
        Series::new(
            source.into(),
            records
                .iter()
                .map(|record| record.source.clone())
                .collect::<Vec<String>>(),
        )
        .into(),
        Series::new(
            year.into(),
            records.iter().map(|record| record.year).collect::<Vec<i32>>(),
        )
        .into(),
        Series::new(
            quarter.into(),
            records
                .iter()
                .map(|record| record.quarter.map(i32::from))
                .collect::<Vec<Option<i32>>>(),
        )
        .into(),
        Series::new(
            period_type.into(),
            records
                .iter()
                .map(|record| record.period_type.as_str())
                .collect::<Vec<&str>>(),
        )
        .into(),
        text_column(region, texts(|record| record.region.as_deref())),
        text_column(county, texts(|record| record.county.as_deref())),
        text_column(species, texts(|record| record.species.as_deref())),
        text_column(product_type, texts(|record| record.product_type.as_deref())),
        float_column(price_avg, floats(|record| record.price_avg)),
        float_column(price_low, floats(|record| record.price_low)),
        float_column(price_high, floats(|record| record.price_high)),
        text_column(unit, texts(|record| record.unit.as_deref())),
        float_column(price_per_ton, floats(|record| record.price_per_ton)),
        float_column(conversion_factor, floats(|record| record.conversion_factor)),
        Series::new(
            sample_size.into(),
            records
                .iter()
                .map(|record| record.sample_size)
                .collect::<Vec<Option<i64>>>(),
        )
        .into(),
        text_column(notes, texts(|record| record.notes.as_deref())),
    ];
    DataFrame::new(columns).map_err(|source| TransformError::Frame { source })
}
