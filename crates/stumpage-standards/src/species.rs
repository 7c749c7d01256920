//! Species-group classification used to pick a conversion factor.

use serde::Serialize;
use std::fmt;

/// Wood density class of a species label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeciesGroup {
    Softwood,
    HardHardwood,
    SoftHardwood,
    MixedHardwood,
}

const SOFTWOOD: &[&str] = &["pine", "spruce", "fir", "hemlock", "cedar", "softwood"];
const HARD_HARDWOOD: &[&str] = &[
    "oak",
    "hickory",
    "beech",
    "hard maple",
    "sugar maple",
    "walnut",
    "cherry",
];
const SOFT_HARDWOOD: &[&str] = &[
    "poplar",
    "tulip",
    "sweetgum",
    "basswood",
    "soft maple",
    "aspen",
    "cottonwood",
];

// Checked in this order; the first group with a matching keyword wins.
const GROUP_KEYWORDS: [(SpeciesGroup, &[&str]); 3] = [
    (SpeciesGroup::Softwood, SOFTWOOD),
    (SpeciesGroup::HardHardwood, HARD_HARDWOOD),
    (SpeciesGroup::SoftHardwood, SOFT_HARDWOOD),
];

impl SpeciesGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeciesGroup::Softwood => "softwood",
            SpeciesGroup::HardHardwood => "hard_hardwood",
            SpeciesGroup::SoftHardwood => "soft_hardwood",
            SpeciesGroup::MixedHardwood => "mixed_hardwood",
        }
    }
}

impl fmt::Display for SpeciesGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifies a free-text species label by case-insensitive keyword match.
///
/// Labels naming no known keyword, and absent labels, fall into
/// [`SpeciesGroup::MixedHardwood`].
pub fn classify_species(species: Option<&str>) -> SpeciesGroup {
    let Some(label) = species else {
        return SpeciesGroup::MixedHardwood;
    };
    let lower = label.to_lowercase();
    GROUP_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map_or(SpeciesGroup::MixedHardwood, |(group, _)| *group)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softwood_checked_before_hardwood_keywords() {
        assert_eq!(
            classify_species(Some("Loblolly Pine")),
            SpeciesGroup::Softwood
        );
        assert_eq!(
            classify_species(Some("Pine-Oak mix")),
            SpeciesGroup::Softwood
        );
    }

    #[test]
    fn maples_split_by_qualifier() {
        assert_eq!(
            classify_species(Some("Sugar Maple")),
            SpeciesGroup::HardHardwood
        );
        assert_eq!(
            classify_species(Some("Soft Maple")),
            SpeciesGroup::SoftHardwood
        );
        assert_eq!(classify_species(Some("Maple")), SpeciesGroup::MixedHardwood);
    }

    #[test]
    fn unknown_and_absent_default_to_mixed() {
        assert_eq!(
            classify_species(Some("White Ash")),
            SpeciesGroup::MixedHardwood
        );
        assert_eq!(classify_species(None), SpeciesGroup::MixedHardwood);
    }
}
