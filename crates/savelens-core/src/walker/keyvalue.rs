//! Properties / INI style `key=value` and `key: value` lines.

use std::sync::LazyLock;

use regex::Regex;

use super::{FieldEntry, FieldValue, Origin};
use crate::model::Location;

static SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[([^\[\]]+)\]\s*$").expect("valid section pattern"));

static PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^\s=:#;\[][^=:]{0,63}?)\s*([=:])\s*(.*?)\s*$").expect("valid pair pattern")
});

/// A parsed `key=value` line, with byte spans into the line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueLine<'a> {
    pub key: &'a str,
    pub separator: char,
    /// Value with surrounding whitespace trimmed (quotes kept)
    pub value: &'a str,
    pub value_start: usize,
    pub value_end: usize,
}

pub(crate) fn is_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('#') || trimmed.starts_with(';')
}

pub(crate) fn section_header(line: &str) -> Option<&str> {
    SECTION
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Parse one line; comments and section headers are not pairs.
pub fn parse_line(line: &str) -> Option<KeyValueLine<'_>> {
    if is_comment(line) || section_header(line).is_some() {
        return None;
    }
    let caps = PAIR.captures(line)?;
    let key = caps.get(1)?.as_str().trim_end();
    let separator = caps.get(2)?.as_str().chars().next()?;
    let value = caps.get(3)?;
    Some(KeyValueLine {
        key,
        separator,
        value: value.as_str(),
        value_start: value.start(),
        value_end: value.end(),
    })
}

pub(crate) fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

pub(crate) fn qualified_key(section: Option<&str>, key: &str) -> String {
    match section {
        Some(section) => format!("{}.{}", section, key),
        None => key.to_string(),
    }
}

/// Ordered `(key, value)` pairs with section prefixes, for sniffing
pub(crate) fn pairs(text: &str) -> Vec<(String, String)> {
    walk(text)
        .into_iter()
        .map(|entry| (entry.key, entry.raw))
        .collect()
}

pub(crate) fn walk(text: &str) -> Vec<FieldEntry> {
    let mut entries = Vec::new();
    let mut section: Option<String> = None;

    for (index, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some(header) = section_header(line) {
            section = Some(header.to_string());
            continue;
        }
        let Some(pair) = parse_line(line) else {
            continue;
        };

        let raw = unquote(pair.value);
        entries.push(FieldEntry::new(
            qualified_key(section.as_deref(), pair.key),
            raw,
            FieldValue::infer(raw),
            Location::line(index + 1, section.as_deref()),
            Origin::KeyValue,
            section.clone().unwrap_or_default(),
        ));
    }

    entries
}
