//! Pattern-based XML extraction.
//!
//! No tree is built: attributes, simple text elements and shared-preferences
//! entries are pulled out with independent patterns so that broken documents
//! still yield whatever is recognisable.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::{FieldEntry, FieldValue, Origin};
use crate::model::{Location, XmlNode};

static TAG_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([A-Za-z_][\w:.\-]*)").expect("valid tag pattern"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][\w:.\-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid attribute pattern")
});

static ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([A-Za-z_][\w:.\-]*)(?:\s[^<>]*)?>([^<]*)</([A-Za-z_][\w:.\-]*)\s*>")
        .expect("valid element pattern")
});

static PREFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<(int|long|float|boolean|string)\s+name\s*=\s*"([^"]*)"\s*(?:value\s*=\s*"([^"]*)"\s*/>|>([^<]*)</string\s*>)"#,
    )
    .expect("valid preference pattern")
});

pub(crate) fn looks_like_xml(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.starts_with("<?xml")
        || (trimmed.starts_with('<') && trimmed.ends_with('>') && trimmed.contains("</"))
}

pub(crate) fn element_names(text: &str) -> BTreeSet<String> {
    TAG_OPEN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Name of the tag whose opening markup contains `position`, if any
fn enclosing_tag(text: &str, position: usize) -> Option<&str> {
    let open = text[..position].rfind('<')?;
    let close = text[..position].rfind('>');
    if close.is_some_and(|close| close > open) {
        return None;
    }
    TAG_OPEN
        .captures(&text[open..position])
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn in_declaration(text: &str, position: usize) -> bool {
    text[..position]
        .rfind('<')
        .is_some_and(|open| text[open + 1..].starts_with('?'))
}

pub(crate) fn walk(text: &str) -> Vec<FieldEntry> {
    let mut entries = Vec::new();
    let mut claimed: HashSet<usize> = HashSet::new();

    for caps in PREFERENCE.captures_iter(text) {
        let (Some(kind), Some(name)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let Some(value) = caps.get(3).or_else(|| caps.get(4)) else {
            continue;
        };
        claimed.insert(value.start());
        let raw = value.as_str();
        let typed = match kind.as_str() {
            "string" => FieldValue::Text(raw.to_string()),
            _ => FieldValue::infer(raw),
        };
        entries.push(FieldEntry::new(
            name.as_str(),
            raw,
            typed,
            Location::Xml {
                node: XmlNode::Preference,
                position: value.start(),
            },
            Origin::XmlPreference,
            kind.as_str(),
        ));
    }

    for caps in ATTRIBUTE.captures_iter(text) {
        let (Some(name), Some(value)) = (caps.get(1), caps.get(2).or_else(|| caps.get(3))) else {
            continue;
        };
        if claimed.contains(&value.start()) || in_declaration(text, name.start()) {
            continue;
        }
        // Attribute syntax outside of markup is just text
        let Some(element) = enclosing_tag(text, name.start()) else {
            continue;
        };
        entries.push(FieldEntry::new(
            name.as_str(),
            value.as_str(),
            FieldValue::infer(value.as_str()),
            Location::Xml {
                node: XmlNode::Attribute,
                position: value.start(),
            },
            Origin::XmlAttribute,
            element,
        ));
    }

    for caps in ELEMENT.captures_iter(text) {
        let (Some(open), Some(body), Some(close)) = (caps.get(1), caps.get(2), caps.get(3)) else {
            continue;
        };
        if open.as_str() != close.as_str() || claimed.contains(&body.start()) {
            continue;
        }
        let trimmed = body.as_str().trim();
        if trimmed.is_empty() {
            continue;
        }
        let lead = body.as_str().len() - body.as_str().trim_start().len();
        entries.push(FieldEntry::new(
            open.as_str(),
            trimmed,
            FieldValue::infer(trimmed),
            Location::Xml {
                node: XmlNode::Element,
                position: body.start() + lead,
            },
            Origin::XmlElement,
            open.as_str(),
        ));
    }

    entries
}
