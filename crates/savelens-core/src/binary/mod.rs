//! Brute-force decoding of unstructured bytes.
//!
//! The layout of a binary save is unknown, so every offset is a hypothesis:
//! integers and floats are read at every position in both byte orders, and
//! printable ASCII runs are searched for embedded `key=value` text. Precision
//! comes later from scoring, not from this pass.

mod endian;
mod numeric;
mod strings;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use tracing::debug;

use crate::config::EngineConfig;
use crate::model::{Candidate, Location};
use crate::scoring::Scorer;
use crate::walker::FieldValue;

pub use endian::guess_byte_order;
pub use numeric::scan_numbers;
pub use strings::{embedded_entries, printable_runs};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum ByteOrder {
    Le,
    Be,
}

impl ByteOrder {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Le => "little-endian",
            Self::Be => "big-endian",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Width {
    Int32,
    Int64,
    Float32,
    Float64,
}

impl Width {
    pub fn size(&self) -> usize {
        match self {
            Self::Int32 | Self::Float32 => 4,
            Self::Int64 | Self::Float64 => 8,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }
}

/// A plausible number read at one offset under one interpretation
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedNumber {
    pub offset: usize,
    pub width: Width,
    pub order: ByteOrder,
    pub value: FieldValue,
    /// Shortest text form of the value as stored
    pub raw: String,
}

impl DecodedNumber {
    pub fn integer(offset: usize, width: Width, order: ByteOrder, value: i64) -> Self {
        Self {
            offset,
            width,
            order,
            value: FieldValue::Integer(value),
            raw: value.to_string(),
        }
    }

    pub fn float(offset: usize, width: Width, order: ByteOrder, value: f64, raw: String) -> Self {
        Self {
            offset,
            width,
            order,
            value: FieldValue::Float(value),
            raw,
        }
    }

    /// Synthetic key such as `int32_le_16`
    pub fn key(&self) -> String {
        format!("{}_{}_{}", self.width, self.order, self.offset)
    }

    pub fn location(&self) -> Location {
        Location::Offset {
            offset: self.offset,
        }
    }
}

/// Recover the width and byte order from a synthetic key like `float32_be_12`.
pub fn layout_from_key(key: &str) -> Option<(Width, ByteOrder)> {
    let mut parts = key.split('_');
    let width = parts.next()?.parse().ok()?;
    let order = parts.next()?.parse().ok()?;
    parts.next()?.parse::<usize>().ok()?;
    Some((width, order))
}

/// Run every binary pass and score the results.
pub fn decode(bytes: &[u8], config: &EngineConfig, file_context: &str) -> Vec<Candidate> {
    let scorer = Scorer::new(config);
    let hint = guess_byte_order(bytes);

    let numbers = scan_numbers(bytes, config, hint);
    let entries = embedded_entries(bytes, config.min_embedded_run);
    debug!(
        "Binary decode: {} numbers, {} embedded pairs, byte order hint {:?}",
        numbers.len(),
        entries.len(),
        hint
    );

    let mut candidates = scorer.score_entries(&entries, file_context);
    candidates.extend(scorer.score_numbers(&numbers, hint, file_context));
    candidates
}
