//! Reporting cadence and price unit enumerations.
//!
//! Both are carried as plain strings in the unified dataset; these enums give
//! the converter and adapters a closed set to match on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Reporting cadence of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PeriodType {
    #[serde(rename = "quarterly")]
    Quarterly,
    #[serde(rename = "annual")]
    Annual,
    /// Two seasons per year. Seasons are stored in the quarter slot.
    #[serde(rename = "semi-annual")]
    SemiAnnual,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Quarterly => "quarterly",
            PeriodType::Annual => "annual",
            PeriodType::SemiAnnual => "semi-annual",
        }
    }

    /// True when records of this cadence are expected to carry a quarter.
    pub fn is_sub_annual(&self) -> bool {
        !matches!(self, PeriodType::Annual)
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quarterly" => Ok(PeriodType::Quarterly),
            "annual" => Ok(PeriodType::Annual),
            "semi-annual" | "semiannual" | "semi_annual" => Ok(PeriodType::SemiAnnual),
            _ => Err(ModelError::UnknownPeriodType {
                value: s.to_string(),
            }),
        }
    }
}

/// Canonical price units understood by the converter.
///
/// Anything else a source reports is kept verbatim in the record's `unit`
/// string and never converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceUnit {
    PerTon,
    PerCord,
    PerMbf,
    Index,
}

impl PriceUnit {
    pub const ALL: [PriceUnit; 4] = [
        PriceUnit::PerTon,
        PriceUnit::PerCord,
        PriceUnit::PerMbf,
        PriceUnit::Index,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceUnit::PerTon => "$/ton",
            PriceUnit::PerCord => "$/cord",
            PriceUnit::PerMbf => "$/mbf",
            PriceUnit::Index => "index",
        }
    }

    /// Whether a physical conversion to $/ton exists for this unit.
    pub fn is_convertible(&self) -> bool {
        !matches!(self, PriceUnit::Index)
    }
}

impl fmt::Display for PriceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PriceUnit {
    type Err = ModelError;

    /// Parses the canonical spellings only (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "$/ton" => Ok(PriceUnit::PerTon),
            "$/cord" => Ok(PriceUnit::PerCord),
            "$/mbf" => Ok(PriceUnit::PerMbf),
            "index" => Ok(PriceUnit::Index),
            _ => Err(ModelError::UnknownPriceUnit {
                value: s.to_string(),
            }),
        }
    }
}

/// How a source's fresh records combine with rows already in a unified file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum MergePolicy {
    /// Existing rows of the source are dropped and replaced.
    #[default]
    Rebuild,
    /// New years are appended; if every incoming year already exists, the
    /// source's rows are replaced wholesale.
    MergeByYear,
    /// Existing rows whose notes contain `marker` are replaced. Used when one
    /// feed writes under several source codes.
    ReplaceMarked { marker: String },
}
