//! Structural traversal of decoded text.
//!
//! Every walker yields flat [`FieldEntry`] leaves carrying the key, the raw
//! value text and a [`Location`] precise enough to find the value again.

pub(crate) mod json;
pub(crate) mod keyvalue;
mod text;
pub(crate) mod xml;

use serde::Serialize;

use crate::model::{DataType, DetectedStructure, Location};

pub use json::{parse_json, parse_json_tolerant};
pub use keyvalue::{KeyValueLine, parse_line};

/// Typed reading of a leaf value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
}

impl FieldValue {
    /// Interpret free text the way a loosely typed save file would.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            return Self::Boolean(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Self::Boolean(false);
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return Self::Integer(n);
        }
        let looks_numeric = !trimmed.is_empty()
            && trimmed.chars().any(|c| c.is_ascii_digit())
            && trimmed
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
        if looks_numeric
            && let Ok(f) = trimmed.parse::<f64>()
            && f.is_finite()
        {
            return Self::Float(f);
        }
        Self::Text(raw.to_string())
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Self::Integer(_) => DataType::Integer,
            Self::Float(_) => DataType::Float,
            Self::Boolean(_) => DataType::Boolean,
            Self::Text(_) => DataType::String,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            Self::Boolean(_) | Self::Text(_) => None,
        }
    }
}

/// Where a leaf came from; drives the description and scoring context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Origin {
    JsonKey,
    XmlAttribute,
    XmlElement,
    XmlPreference,
    KeyValue,
    PlainText,
    EmbeddedText,
}

impl Origin {
    pub fn label(&self) -> &'static str {
        match self {
            Self::JsonKey => "JSON key",
            Self::XmlAttribute => "XML attribute",
            Self::XmlElement => "XML element",
            Self::XmlPreference => "XML preference",
            Self::KeyValue => "Key-Value",
            Self::PlainText => "Plain text",
            Self::EmbeddedText => "Embedded text in binary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldEntry {
    pub key: String,
    /// Value text exactly as it appears in the file (minus quoting)
    pub raw: String,
    pub value: FieldValue,
    pub location: Location,
    pub origin: Origin,
    /// Enclosing path, section or element; used as scoring context
    pub context: String,
}

impl FieldEntry {
    pub fn new(
        key: impl Into<String>,
        raw: impl Into<String>,
        value: FieldValue,
        location: Location,
        origin: Origin,
        context: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            raw: raw.into(),
            value,
            location,
            origin,
            context: context.into(),
        }
    }
}

/// Visit every leaf of an already classified text document.
pub fn walk(structure: &DetectedStructure, text: &str, max_depth: usize) -> Vec<FieldEntry> {
    match structure {
        DetectedStructure::Json { .. } => json::walk(text, max_depth),
        DetectedStructure::Xml { .. } => xml::walk(text),
        DetectedStructure::KeyValue { .. } => keyvalue::walk(text),
        DetectedStructure::PlainText => text::walk(text),
        DetectedStructure::Binary
        | DetectedStructure::Database { .. }
        | DetectedStructure::Unknown => Vec::new(),
    }
}
