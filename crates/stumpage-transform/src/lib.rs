//! Stumpage record transformation.
//!
//! - **normalization**: product type and unit normalization
//! - **conversion**: $/ton conversion via the factor registry
//! - **dedupe**: one record per dataset key
//! - **merge**: late-source merge policies against an existing dataset
//! - **dataset** / **frame_builder**: unified CSV input and output
//! - **stats**: dataset summary statistics

pub mod conversion;
pub mod dataset;
pub mod dedupe;
pub mod error;
pub mod frame_builder;
pub mod merge;
pub mod normalization;
pub mod stats;

pub use conversion::{ConversionStats, convert_record, convert_records, tons_per_unit};
pub use dataset::{read_unified, write_unified};
pub use dedupe::deduplicate;
pub use error::{Result, TransformError};
pub use frame_builder::build_unified_frame;
pub use merge::{MergeOutcome, SourceBatch, merge_batches, sort_records};
pub use normalization::{normalize_record, standardize_product_type, standardize_unit};
pub use stats::{DatasetStats, PriceSummary, SourceCoverage, YearSpan};
