//! Per-source configuration records.
//!
//! Every source is described by data rather than code: where its input lives,
//! which input shape it has, and how its columns map onto the canonical
//! record. Configurations serialize to JSON so a run can replace the
//! built-in set.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use stumpage_model::{MergePolicy, PeriodType};

use crate::classify::ClassifierConfig;
use crate::error::{IngestError, Result};

/// Where one canonical field's value comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum FieldSource {
    #[default]
    Absent,
    /// A named column. A missing non-optional column fails the source.
    Column {
        name: String,
        #[serde(default)]
        optional: bool,
    },
    /// The first of several columns present in the header.
    FirstOf { names: Vec<String> },
    Constant { value: String },
    /// `template` with `{}` replaced by the cell. With `digits_only`,
    /// non-numeric cells pass through untemplated.
    Format {
        column: String,
        template: String,
        #[serde(default)]
        digits_only: bool,
    },
    /// Case-insensitive code table. Unlisted or blank cells take `default`.
    Lookup {
        column: String,
        entries: BTreeMap<String, String>,
        #[serde(default)]
        default: Option<String>,
    },
}

impl FieldSource {
    pub fn column(name: &str) -> Self {
        FieldSource::Column {
            name: name.to_string(),
            optional: false,
        }
    }

    pub fn optional(name: &str) -> Self {
        FieldSource::Column {
            name: name.to_string(),
            optional: true,
        }
    }

    pub fn first_of(names: &[&str]) -> Self {
        FieldSource::FirstOf {
            names: names.iter().map(|name| (*name).to_string()).collect(),
        }
    }

    pub fn constant(value: &str) -> Self {
        FieldSource::Constant {
            value: value.to_string(),
        }
    }

    pub fn format(column: &str, template: &str) -> Self {
        FieldSource::Format {
            column: column.to_string(),
            template: template.to_string(),
            digits_only: false,
        }
    }

    pub fn lookup(column: &str, entries: &[(&str, &str)], default: Option<&str>) -> Self {
        FieldSource::Lookup {
            column: column.to_string(),
            entries: entries
                .iter()
                .map(|(key, value)| (key.to_lowercase(), (*value).to_string()))
                .collect(),
            default: default.map(str::to_string),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldSource::Absent)
    }
}

/// Column mapping for a tabular source. Unlisted fields stay null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub year: FieldSource,
    pub quarter: FieldSource,
    pub region: FieldSource,
    pub county: FieldSource,
    pub species: FieldSource,
    pub product_type: FieldSource,
    pub price_avg: FieldSource,
    pub price_low: FieldSource,
    pub price_high: FieldSource,
    pub unit: FieldSource,
    pub sample_size: FieldSource,
    pub notes: FieldSource,
}

/// A pre-parsed per-source CSV file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSource {
    /// Relative to the raw data directory.
    pub path: PathBuf,
    pub period_type: PeriodType,
    pub fields: FieldMapping,
}

/// A directory of extracted report documents run through the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSource {
    pub dir: PathBuf,
    pub period_type: PeriodType,
    /// Region for rows no page text or marker row placed.
    pub default_region: String,
    /// Fill `price_avg` with the low/high midpoint when both are present.
    #[serde(default)]
    pub derive_midpoint: bool,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Individual timber sale results aggregated per year and timber type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSource {
    pub path: PathBuf,
    pub region: String,
    pub product_type: String,
    pub unit: String,
    /// `{year}` is replaced by the aggregate's year.
    pub notes: String,
    pub species_by_type: BTreeMap<String, String>,
    pub default_species: String,
}

/// National forest administered stumpage: a regional and a species file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsfsSource {
    pub combined_path: PathBuf,
    pub species_path: PathBuf,
    /// Leading notes text; also the merge marker.
    pub marker: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceInput {
    Table(TableSource),
    Documents(DocumentSource),
    Sales(SalesSource),
    Usfs(UsfsSource),
}

impl SourceInput {
    pub fn kind(&self) -> &'static str {
        match self {
            SourceInput::Table(_) => "table",
            SourceInput::Documents(_) => "documents",
            SourceInput::Sales(_) => "sales",
            SourceInput::Usfs(_) => "usfs",
        }
    }

    /// Primary input location, relative to the raw directory.
    pub fn location(&self) -> &Path {
        match self {
            SourceInput::Table(table) => &table.path,
            SourceInput::Documents(documents) => &documents.dir,
            SourceInput::Sales(sales) => &sales.path,
            SourceInput::Usfs(usfs) => &usfs.combined_path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Short agency or state code written to `source`.
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub merge: MergePolicy,
    pub input: SourceInput,
}

/// Reads a JSON array of source configurations.
pub fn load_source_configs(path: &Path) -> Result<Vec<SourceConfig>> {
    let bytes = fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let configs: Vec<SourceConfig> =
        serde_json::from_slice(&bytes).map_err(|source| IngestError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    let mut codes = std::collections::BTreeSet::new();
    for config in &configs {
        if !codes.insert(config.code.as_str()) {
            return Err(IngestError::InvalidConfig {
                code: config.code.clone(),
                reason: "duplicate source code".to_string(),
            });
        }
    }
    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_source_reads_tagged_json() {
        let source: FieldSource =
            serde_json::from_str(r#"{"from": "column", "name": "price"}"#).unwrap();
        assert_eq!(source, FieldSource::column("price"));
        let absent: FieldMapping = serde_json::from_str(r#"{}"#).unwrap();
        assert!(absent.year.is_absent());
    }

    #[test]
    fn lookup_keys_are_lowercased() {
        let FieldSource::Lookup { entries, .. } =
            FieldSource::lookup("product", &[("SAW", "sawtimber")], None)
        else {
            panic!("expected lookup");
        };
        assert_eq!(entries.get("saw").map(String::as_str), Some("sawtimber"));
    }
}
