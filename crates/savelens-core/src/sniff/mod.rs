//! Format sniffing.
//!
//! Classification is a cascade where the first match wins:
//! text decoding, JSON (strict then tolerant), XML, key-value lines, plain
//! text. Bytes that never decode as text are checked for a SQLite header and
//! otherwise treated as binary. A failed parse only ever means "not this
//! format"; this module has no error path.

mod charset;

use std::sync::LazyLock;

use regex::bytes::Regex;
use tracing::debug;

use crate::model::DetectedStructure;
use crate::walker::{json, keyvalue, xml};

pub use charset::{DecodedText, TextEncoding, decode_text, printable_ratio};

const SQLITE_MAGIC: &[u8] = b"SQLite";
const DEFAULT_PRINTABLE_RATIO: f64 = 0.7;
const KEY_DEPTH_LIMIT: usize = 64;

static CREATE_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?["'`\[]?([A-Za-z_][A-Za-z0-9_]*)"#)
        .expect("valid create table pattern")
});

/// Outcome of sniffing: the structure plus the decoded text, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Sniffed {
    pub structure: DetectedStructure,
    pub text: Option<DecodedText>,
}

impl Sniffed {
    pub fn encoding_name(&self) -> Option<&'static str> {
        self.text.as_ref().map(|t| t.encoding.name())
    }
}

/// Classify raw bytes with the default printable threshold.
pub fn classify(bytes: &[u8]) -> DetectedStructure {
    sniff(bytes, DEFAULT_PRINTABLE_RATIO).structure
}

pub fn sniff(bytes: &[u8], printable_ratio: f64) -> Sniffed {
    let Some(decoded) = decode_text(bytes, printable_ratio) else {
        let structure = if bytes.starts_with(SQLITE_MAGIC) {
            DetectedStructure::Database {
                tables: table_names(bytes),
            }
        } else {
            DetectedStructure::Binary
        };
        debug!("Sniffed {} bytes as {}", bytes.len(), structure.kind());
        return Sniffed {
            structure,
            text: None,
        };
    };

    let structure = classify_text(&decoded.text);
    debug!(
        "Sniffed {} bytes as {} ({})",
        bytes.len(),
        structure.kind(),
        decoded.encoding.name()
    );
    Sniffed {
        structure,
        text: Some(decoded),
    }
}

fn classify_text(text: &str) -> DetectedStructure {
    if let Some(value) = json::parse_any(text) {
        return DetectedStructure::Json {
            keys: json::collect_keys(&value, KEY_DEPTH_LIMIT),
        };
    }

    if xml::looks_like_xml(text) {
        return DetectedStructure::Xml {
            elements: xml::element_names(text),
        };
    }

    let pairs = keyvalue::pairs(text);
    if !pairs.is_empty() {
        return DetectedStructure::KeyValue { pairs };
    }

    DetectedStructure::PlainText
}

/// Table names declared in the schema text of a SQLite file
fn table_names(bytes: &[u8]) -> Vec<String> {
    let mut tables: Vec<String> = Vec::new();
    for caps in CREATE_TABLE.captures_iter(bytes) {
        if let Some(name) = caps.get(1) {
            let name = String::from_utf8_lossy(name.as_bytes()).into_owned();
            if !tables.contains(&name) {
                tables.push(name);
            }
        }
    }
    tables
}
