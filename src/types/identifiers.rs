//! Document identifier types for the trajectory loader
//!
//! Composed identifiers are derived from the time step an item was created at and
//! its position inside that step's batch.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Explicit identifier of a document in the index, rendered as `"{time_step}_{index}"`
///
/// Submitting the same `(time_step, index)` pair twice yields the same identifier;
/// the backend reports that as a create conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId {
    /// Time step (epoch second) the item was created at
    pub time_step: i64,
    /// Position of the item in its batch
    pub index: usize,
}

impl DocumentId {
    /// Compose an identifier from a time step and batch position
    pub fn composed(time_step: i64, index: usize) -> Self {
        Self { time_step, index }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.time_step, self.index)
    }
}

impl FromStr for DocumentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Time steps may be negative, so split on the last underscore
        let (time_step, index) = s
            .rsplit_once('_')
            .ok_or_else(|| format!("Invalid document id: {}", s))?;
        let time_step = time_step
            .parse::<i64>()
            .map_err(|e| format!("Invalid time step in document id {}: {}", s, e))?;
        let index = index
            .parse::<usize>()
            .map_err(|e| format!("Invalid batch index in document id {}: {}", s, e))?;
        Ok(Self { time_step, index })
    }
}

impl Serialize for DocumentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_format() {
        assert_eq!(DocumentId::composed(1_700_000_000, 3).to_string(), "1700000000_3");
        assert_eq!(DocumentId::composed(0, 0).to_string(), "0_0");
    }

    #[test]
    fn test_document_id_parse_negative_time_step() {
        let id: DocumentId = "-5_2".parse().unwrap();
        assert_eq!(id, DocumentId::composed(-5, 2));
        assert!("12".parse::<DocumentId>().is_err());
        assert!("a_1".parse::<DocumentId>().is_err());
    }

    #[test]
    fn test_document_id_serializes_as_string() {
        let id = DocumentId::composed(42, 7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42_7\"");
        let back: DocumentId = serde_json::from_str("\"42_7\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_same_pair_collides() {
        assert_eq!(DocumentId::composed(10, 1), DocumentId::composed(10, 1));
        assert_ne!(DocumentId::composed(10, 1), DocumentId::composed(11, 1));
    }
}
