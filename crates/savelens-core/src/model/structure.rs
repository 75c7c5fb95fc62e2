use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// Result of format sniffing; exactly one shape per file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectedStructure {
    Json { keys: BTreeSet<String> },
    Xml { elements: BTreeSet<String> },
    KeyValue { pairs: Vec<(String, String)> },
    Binary,
    PlainText,
    Database { tables: Vec<String> },
    Unknown,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    #[strum(serialize = "JSON")]
    Json,
    #[strum(serialize = "XML")]
    Xml,
    #[strum(serialize = "Key-Value")]
    KeyValue,
    #[strum(serialize = "Binary")]
    Binary,
    #[strum(serialize = "Plain text")]
    PlainText,
    #[strum(serialize = "Database")]
    Database,
    #[strum(serialize = "Unknown")]
    Unknown,
}

impl DetectedStructure {
    pub fn kind(&self) -> StructureKind {
        match self {
            Self::Json { .. } => StructureKind::Json,
            Self::Xml { .. } => StructureKind::Xml,
            Self::KeyValue { .. } => StructureKind::KeyValue,
            Self::Binary => StructureKind::Binary,
            Self::PlainText => StructureKind::PlainText,
            Self::Database { .. } => StructureKind::Database,
            Self::Unknown => StructureKind::Unknown,
        }
    }

    /// Whether analysis works on decoded text rather than raw bytes
    pub fn is_text(&self) -> bool {
        match self.kind() {
            StructureKind::Json
            | StructureKind::Xml
            | StructureKind::KeyValue
            | StructureKind::PlainText => true,
            StructureKind::Binary | StructureKind::Database | StructureKind::Unknown => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(DetectedStructure::Binary.kind(), StructureKind::Binary);
        assert_eq!(
            DetectedStructure::KeyValue { pairs: vec![] }.kind(),
            StructureKind::KeyValue
        );
        assert_eq!(StructureKind::KeyValue.to_string(), "Key-Value");
    }

    #[test]
    fn test_is_text() {
        assert!(DetectedStructure::PlainText.is_text());
        assert!(!DetectedStructure::Database { tables: vec![] }.is_text());
        assert!(!DetectedStructure::Unknown.is_text());
    }
}
