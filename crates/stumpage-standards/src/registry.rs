//! Lookup over the static factor tables.

use crate::error::StandardsError;
use crate::factors::{CORD_TO_TON, ConversionFactor, FactorUnit, MBF_TO_TON};
use crate::species::{SpeciesGroup, classify_species};

/// Every registered factor, cord table first.
pub fn all_factors() -> impl Iterator<Item = &'static ConversionFactor> {
    CORD_TO_TON.iter().chain(MBF_TO_TON.iter())
}

/// Looks up a factor by its registry key.
pub fn factor(key: &str) -> Result<&'static ConversionFactor, StandardsError> {
    all_factors()
        .find(|entry| entry.key == key)
        .ok_or_else(|| StandardsError::UnknownFactor {
            key: key.to_string(),
        })
}

/// Position of each group's entry in [`CORD_TO_TON`].
fn cord_index(group: SpeciesGroup) -> usize {
    match group {
        SpeciesGroup::SoftHardwood => 3,
        SpeciesGroup::MixedHardwood => 4,
        SpeciesGroup::HardHardwood => 5,
        SpeciesGroup::Softwood => 6,
    }
}

/// Position of each group's entry in [`MBF_TO_TON`].
fn mbf_index(group: SpeciesGroup) -> usize {
    match group {
        SpeciesGroup::Softwood => 4,
        SpeciesGroup::HardHardwood | SpeciesGroup::SoftHardwood | SpeciesGroup::MixedHardwood => 8,
    }
}

/// Tons per cord for a species group.
pub fn cord_factor(group: SpeciesGroup) -> &'static ConversionFactor {
    &CORD_TO_TON[cord_index(group)]
}

/// Tons per MBF for a species group. Only softwood is distinguished.
pub fn mbf_factor(group: SpeciesGroup) -> &'static ConversionFactor {
    &MBF_TO_TON[mbf_index(group)]
}

/// Resolves the factor for a volume unit and free-text species label.
pub fn factor_for_species(unit: FactorUnit, species: Option<&str>) -> &'static ConversionFactor {
    let group = classify_species(species);
    match unit {
        FactorUnit::Cord => cord_factor(group),
        FactorUnit::Mbf => mbf_factor(group),
    }
}
