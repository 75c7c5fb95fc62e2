//! Confidence fusion.
//!
//! Turns walked leaves and decoded binary numbers into scored [`Candidate`]s.

mod fusion;

use std::collections::HashMap;

use crate::binary::{ByteOrder, DecodedNumber};
use crate::classify::Classifier;
use crate::config::EngineConfig;
use crate::model::{Candidate, DataType};
use crate::walker::{FieldEntry, FieldValue, Origin};

pub use fusion::{Signals, alignment_delta, frequency_delta, fuse};

pub struct Scorer<'a> {
    config: &'a EngineConfig,
    classifier: Classifier<'a>,
}

impl<'a> Scorer<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            classifier: Classifier::new(config),
        }
    }

    /// Score keyed leaves from a structural walk or embedded text.
    ///
    /// Plain-text leaves are only kept when their label matched a keyword;
    /// free text is otherwise too noisy to be useful.
    pub fn score_entries(&self, entries: &[FieldEntry], file_context: &str) -> Vec<Candidate> {
        let weights = &self.config.weights;
        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        for entry in entries {
            *occurrences.entry(entry.key.as_str()).or_default() += 1;
        }

        entries
            .iter()
            .filter_map(|entry| {
                let context = format!("{} {}", file_context, entry.context);
                let classification = self
                    .classifier
                    .classify(&entry.key, &entry.value, &context);
                if entry.origin == Origin::PlainText && !classification.matched_keyword() {
                    return None;
                }

                let mut signals = Signals::from_classification(&classification);
                signals.frequency = frequency_delta(
                    weights,
                    occurrences.get(entry.key.as_str()).copied().unwrap_or(1),
                );
                if let Some(offset) = entry.location.byte_offset() {
                    signals.alignment = alignment_delta(weights, offset);
                }

                let category = classification.category;
                let description = format!(
                    "{} value from {} '{}'",
                    category.label(),
                    entry.origin.label(),
                    entry.key
                );
                Some(
                    Candidate::new(
                        entry.key.clone(),
                        entry.raw.clone(),
                        entry.value.data_type(),
                        category,
                        fuse(weights, &signals),
                        entry.location.clone(),
                    )
                    .with_description(description),
                )
            })
            .collect()
    }

    /// Score numbers decoded from raw binary.
    ///
    /// They carry no key, so confidence comes from magnitude, alignment,
    /// repetition and the file name only.
    pub fn score_numbers(
        &self,
        numbers: &[DecodedNumber],
        byte_order_hint: Option<ByteOrder>,
        file_context: &str,
    ) -> Vec<Candidate> {
        let weights = &self.config.weights;
        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        for number in numbers {
            *occurrences.entry(number.raw.as_str()).or_default() += 1;
        }

        numbers
            .iter()
            .map(|number| {
                let classification = self.classifier.classify("", &number.value, file_context);
                let mut signals = Signals::from_classification(&classification);
                signals.frequency = frequency_delta(
                    weights,
                    occurrences.get(number.raw.as_str()).copied().unwrap_or(1),
                );
                signals.alignment = alignment_delta(weights, number.offset);
                if byte_order_hint == Some(number.order) {
                    signals.alignment += weights.byte_order_bonus;
                }

                let category = classification.category;
                let data_type = match number.value {
                    FieldValue::Float(_) => DataType::Float,
                    _ => DataType::legacy_alias(category),
                };
                let description = format!(
                    "{} value decoded from binary as {} ({})",
                    category.label(),
                    number.width,
                    number.order.label()
                );
                Candidate::new(
                    number.key(),
                    number.raw.clone(),
                    data_type,
                    category,
                    fuse(weights, &signals),
                    number.location(),
                )
                .with_description(description)
            })
            .collect()
    }
}
