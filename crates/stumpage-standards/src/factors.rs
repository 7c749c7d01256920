//! Published volume-to-weight conversion factors.
//!
//! Factors are tons per unit of volume, so a volumetric price divides by the
//! factor to yield $/ton. One ton is 2,000 lb; one cord is 128 ft³ of stacked
//! roundwood; one MBF is 1,000 board feet under the source's log rule.

use serde::Serialize;
use std::fmt;

/// Volume unit a factor converts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorUnit {
    Cord,
    Mbf,
}

impl FactorUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactorUnit::Cord => "cord",
            FactorUnit::Mbf => "mbf",
        }
    }
}

impl fmt::Display for FactorUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single tons-per-unit factor with its citation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConversionFactor {
    pub key: &'static str,
    /// Tons per unit.
    pub factor: f64,
    pub unit_from: FactorUnit,
    pub species_group: &'static str,
    pub product: &'static str,
    pub source: &'static str,
    pub notes: &'static str,
}

const MSU_PINE: &str = "MSU Extension P2244";
const MSU_HARDWOOD: &str = "MSU Extension P3448";
const MSU_HARDWOOD_STATUTE: &str = "MSU Extension P3448; MS Code § 75-27-39";

const fn cord(
    key: &'static str,
    factor: f64,
    species_group: &'static str,
    source: &'static str,
    notes: &'static str,
) -> ConversionFactor {
    ConversionFactor {
        key,
        factor,
        unit_from: FactorUnit::Cord,
        species_group,
        product: "Pulpwood",
        source,
        notes,
    }
}

const fn mbf(
    key: &'static str,
    factor: f64,
    species_group: &'static str,
    source: &'static str,
    notes: &'static str,
) -> ConversionFactor {
    ConversionFactor {
        key,
        factor,
        unit_from: FactorUnit::Mbf,
        species_group,
        product: "Sawtimber",
        source,
        notes,
    }
}

/// Tons per cord of pulpwood.
pub static CORD_TO_TON: [ConversionFactor; 8] = [
    cord(
        "pine_pulpwood",
        2.67,
        "Pine",
        MSU_PINE,
        "Average of loblolly/shortleaf (2.60) and longleaf/slash (2.78)",
    ),
    cord(
        "pine_loblolly_shortleaf",
        2.60,
        "Pine",
        MSU_PINE,
        "Loblolly and shortleaf pine pulpwood",
    ),
    cord(
        "pine_longleaf_slash",
        2.78,
        "Pine",
        MSU_PINE,
        "Longleaf and slash pine, higher specific gravity",
    ),
    cord(
        "hardwood_soft",
        2.70,
        "Hardwood",
        MSU_HARDWOOD_STATUTE,
        "Soft hardwoods: sweetgum, yellow poplar",
    ),
    cord(
        "hardwood_mixed",
        2.80,
        "Hardwood",
        MSU_HARDWOOD_STATUTE,
        "Mixed hardwood species",
    ),
    cord(
        "hardwood_hard",
        2.90,
        "Hardwood",
        MSU_HARDWOOD_STATUTE,
        "Hard hardwoods: oak, hickory",
    ),
    cord(
        "softwood_avg",
        2.67,
        "Softwood",
        MSU_PINE,
        "Average for southern pine species",
    ),
    cord(
        "hardwood_avg",
        2.80,
        "Hardwood",
        MSU_HARDWOOD,
        "Average for mixed hardwood",
    ),
];

/// Tons per thousand board feet of sawtimber, by DBH class.
pub static MBF_TO_TON: [ConversionFactor; 9] = [
    mbf("pine_sawtimber_10in", 14.0, "Pine", MSU_PINE, "10-inch DBH timber"),
    mbf("pine_sawtimber_14in", 8.5, "Pine", MSU_PINE, "14-inch DBH timber"),
    mbf(
        "pine_sawtimber_18in",
        7.2,
        "Pine",
        MSU_PINE,
        "18-inch DBH timber (typical average)",
    ),
    mbf("pine_sawtimber_24in", 5.9, "Pine", MSU_PINE, "24-inch DBH timber"),
    mbf(
        "pine_sawtimber_avg",
        7.0,
        "Pine",
        MSU_PINE,
        "Average for typical pine sawtimber (16-20\" DBH)",
    ),
    mbf(
        "hardwood_sawtimber_14in",
        12.1,
        "Hardwood",
        MSU_HARDWOOD,
        "14-inch DBH timber",
    ),
    mbf(
        "hardwood_sawtimber_18in",
        9.8,
        "Hardwood",
        MSU_HARDWOOD,
        "18-inch DBH timber",
    ),
    mbf(
        "hardwood_sawtimber_24in",
        8.1,
        "Hardwood",
        MSU_HARDWOOD,
        "24-inch DBH timber",
    ),
    mbf(
        "hardwood_sawtimber_avg",
        8.5,
        "Hardwood",
        MSU_HARDWOOD,
        "Mills typically use 8-9 tons/MBF for hardwood sawlogs",
    ),
];
