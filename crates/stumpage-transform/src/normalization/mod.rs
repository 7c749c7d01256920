//! Free-text field normalization applied before conversion.
//!
//! - **product**: ordered product-type rules
//! - **unit**: price unit spellings

pub mod product;
pub mod unit;

use stumpage_model::CanonicalRecord;

pub use product::{PRODUCT_RULES, ProductRule, is_canonical_product, standardize_product_type};
pub use unit::standardize_unit;

/// Normalizes a record's product type and unit.
pub fn normalize_record(mut record: CanonicalRecord) -> CanonicalRecord {
    record.product_type = standardize_product_type(record.product_type.as_deref());
    record.unit = standardize_unit(record.unit.as_deref());
    record
}
