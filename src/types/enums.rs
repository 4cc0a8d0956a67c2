//! Enumeration types for the trajectory loader
//!
//! This module contains the categorical tags attached to generated items and the
//! record schema variants that decide which tags, identifiers, and mapping a run uses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Categorical tag attached to an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    /// Tracked by several sources at once
    #[serde(rename = "T")]
    T,
    /// Reported by a single source
    #[serde(rename = "R")]
    R,
}

impl ItemType {
    /// Probability that a freshly created item is tagged `T`
    pub const T_PROBABILITY: f64 = 0.3;

    /// Upper bound on the number of sources a `T` item carries
    pub const MAX_T_SOURCES: usize = 4;
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemType::T => write!(f, "T"),
            ItemType::R => write!(f, "R"),
        }
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "T" => Ok(ItemType::T),
            "R" => Ok(ItemType::R),
            _ => Err(format!("Unknown item type: {}", s)),
        }
    }
}

/// One of the fixed source identifiers an item can be reported by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    /// Source RS1
    #[serde(rename = "RS1")]
    Rs1,
    /// Source RS2
    #[serde(rename = "RS2")]
    Rs2,
    /// Source RS3
    #[serde(rename = "RS3")]
    Rs3,
    /// Source RS4
    #[serde(rename = "RS4")]
    Rs4,
    /// Source RS5
    #[serde(rename = "RS5")]
    Rs5,
    /// Source RS6
    #[serde(rename = "RS6")]
    Rs6,
}

impl Source {
    /// Every source, in enumeration order
    pub const ALL: [Source; 6] =
        [Source::Rs1, Source::Rs2, Source::Rs3, Source::Rs4, Source::Rs5, Source::Rs6];

    /// Wire name of the source
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Rs1 => "RS1",
            Source::Rs2 => "RS2",
            Source::Rs3 => "RS3",
            Source::Rs4 => "RS4",
            Source::Rs5 => "RS5",
            Source::Rs6 => "RS6",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .iter()
            .copied()
            .find(|source| source.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown source: {}", s))
    }
}

/// How document identifiers are assigned in a bulk request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdPolicy {
    /// The backend assigns an identifier to every created document
    BackendAssigned,
    /// Identifiers are composed as `"{time_step}_{index_in_batch}"`
    Composed,
}

/// How time fields are declared in the index mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeFieldFormat {
    /// `date` fields parsed as epoch seconds
    EpochSecondDate,
    /// Plain integer (`long`) fields
    Integer,
}

/// Record schema variant of a run
///
/// The variant decides which tags each item carries, how documents are
/// identified, and how time fields are mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordSchema {
    /// `type` plus a list of sources; backend-assigned ids; date-typed times
    #[default]
    Tagged,
    /// A single nullable source; composed ids; integer times
    SingleSource,
    /// No tags and no `indexed` field; backend-assigned ids; date-typed times
    Untagged,
}

impl RecordSchema {
    /// Whether items carry a `type` tag
    pub fn has_type(&self) -> bool {
        matches!(self, RecordSchema::Tagged)
    }

    /// Whether documents carry the `indexed` submission timestamp
    pub fn has_indexed(&self) -> bool {
        !matches!(self, RecordSchema::Untagged)
    }

    /// Whether items carry a `src` field
    pub fn has_source(&self) -> bool {
        !matches!(self, RecordSchema::Untagged)
    }

    /// Identifier policy used when writing this schema
    pub fn id_policy(&self) -> IdPolicy {
        match self {
            RecordSchema::SingleSource => IdPolicy::Composed,
            RecordSchema::Tagged | RecordSchema::Untagged => IdPolicy::BackendAssigned,
        }
    }

    /// Mapping type for `indexed`, `startTime` and `endTime`
    pub fn time_field_format(&self) -> TimeFieldFormat {
        match self {
            RecordSchema::SingleSource => TimeFieldFormat::Integer,
            RecordSchema::Tagged | RecordSchema::Untagged => TimeFieldFormat::EpochSecondDate,
        }
    }
}

impl fmt::Display for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordSchema::Tagged => write!(f, "tagged"),
            RecordSchema::SingleSource => write!(f, "single-source"),
            RecordSchema::Untagged => write!(f, "untagged"),
        }
    }
}

impl FromStr for RecordSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tagged" => Ok(RecordSchema::Tagged),
            "single-source" | "singlesource" | "single" => Ok(RecordSchema::SingleSource),
            "untagged" | "plain" => Ok(RecordSchema::Untagged),
            _ => Err(format!("Unknown record schema: {}", s)),
        }
    }
}
