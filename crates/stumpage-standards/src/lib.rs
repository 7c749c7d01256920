#![deny(unsafe_code)]

pub mod error;
pub mod factors;
pub mod registry;
pub mod species;

pub use crate::error::StandardsError;
pub use crate::factors::{ConversionFactor, FactorUnit};
pub use crate::registry::{all_factors, cord_factor, factor, factor_for_species, mbf_factor};
pub use crate::species::{SpeciesGroup, classify_species};
