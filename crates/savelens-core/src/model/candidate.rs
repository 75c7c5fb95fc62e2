use serde::{Deserialize, Serialize};

use super::{Category, DataType, Location};

/// A possible game value found in a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub key: String,
    pub raw_value: String,
    pub data_type: DataType,
    pub category: Category,
    pub confidence: f64,
    pub location: Location,
    pub description: String,
    /// Set only when an edit is proposed, to allow diffing and rollback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_value: Option<String>,
}

impl Candidate {
    pub fn new(
        key: impl Into<String>,
        raw_value: impl Into<String>,
        data_type: DataType,
        category: Category,
        confidence: f64,
        location: Location,
    ) -> Self {
        let mut candidate = Self {
            key: key.into(),
            raw_value: raw_value.into(),
            data_type,
            category,
            confidence: 0.0,
            location,
            description: String::new(),
            original_value: None,
        };
        candidate.set_confidence(confidence);
        candidate
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Confidence is always kept inside [0, 1]; NaN collapses to 0.
    pub fn set_confidence(&mut self, confidence: f64) {
        self.confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
    }

    /// Copy of this candidate carrying a proposed edit.
    ///
    /// The current value moves to `original_value` (unless an edit was already
    /// attached, in which case the first original is kept).
    pub fn with_edit(&self, new_value: impl Into<String>) -> Self {
        let mut edited = self.clone();
        edited.original_value = Some(
            self.original_value
                .clone()
                .unwrap_or_else(|| self.raw_value.clone()),
        );
        edited.raw_value = new_value.into();
        edited
    }

    /// The value as it currently appears in the file.
    pub fn current_value(&self) -> &str {
        self.original_value.as_deref().unwrap_or(&self.raw_value)
    }

    /// Identity used for deduplication
    pub fn identity(&self) -> (&str, &str, &Location) {
        (&self.key, &self.raw_value, &self.location)
    }
}
