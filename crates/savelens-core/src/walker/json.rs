use std::collections::BTreeSet;

use serde_json::Value;
use tracing::debug;

use super::{FieldEntry, FieldValue, Origin};
use crate::model::Location;

/// Strict parse; only a top-level object counts as a JSON save.
pub fn parse_json(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => Some(value),
        Ok(_) => None,
        Err(e) => {
            debug!("Strict JSON parse failed: {}", e);
            None
        }
    }
}

/// Lenient parse: tolerates a byte order mark, `//` and `/* */` comments and
/// trailing commas, and accepts a top-level array.
pub fn parse_json_tolerant(text: &str) -> Option<Value> {
    let cleaned = strip_json_noise(text.trim_start_matches('\u{feff}'));
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        Ok(_) => None,
        Err(e) => {
            debug!("Tolerant JSON parse failed: {}", e);
            None
        }
    }
}

/// Parse with the strict parser first, then the tolerant one.
pub(crate) fn parse_any(text: &str) -> Option<Value> {
    parse_json(text).or_else(|| parse_json_tolerant(text))
}

fn strip_json_noise(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    let mut in_string = false;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' && i + 1 < chars.len() {
                out.push(chars[i + 1]);
                i += 2;
                continue;
            }
            if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
                i += 1;
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i += 2;
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
                i += 1;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// All object keys in the document, up to `max_depth` levels deep
pub fn collect_keys(value: &Value, max_depth: usize) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    let mut stack = vec![(value, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        if depth >= max_depth {
            continue;
        }
        match node {
            Value::Object(map) => {
                for (key, child) in map {
                    keys.insert(key.clone());
                    stack.push((child, depth + 1));
                }
            }
            Value::Array(items) => stack.extend(items.iter().map(|item| (item, depth + 1))),
            _ => {}
        }
    }
    keys
}

/// Append one object key to a path.
///
/// Keys that would read back ambiguously (empty, or holding `.`, brackets,
/// quotes or backslashes) are written as a quoted segment: `save["a.b"]`.
pub(crate) fn join_key(parent: &str, key: &str) -> String {
    let plain = !key.is_empty() && !key.contains(['.', '[', ']', '"', '\\']);
    if !plain {
        format!("{}[{}]", parent, Value::from(key))
    } else if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// Yield every scalar leaf in document order.
///
/// Content nested deeper than `max_depth` is skipped rather than descended into.
pub(crate) fn walk(text: &str, max_depth: usize) -> Vec<FieldEntry> {
    let Some(root) = parse_any(text) else {
        debug!("JSON walk skipped: document no longer parses");
        return Vec::new();
    };
    walk_value(&root, max_depth)
}

pub(crate) fn walk_value(root: &Value, max_depth: usize) -> Vec<FieldEntry> {
    struct Frame<'a> {
        value: &'a Value,
        key: String,
        path: String,
        parent: String,
        depth: usize,
    }

    let mut entries = Vec::new();
    let mut stack = vec![Frame {
        value: root,
        key: String::new(),
        path: String::new(),
        parent: String::new(),
        depth: 0,
    }];

    while let Some(frame) = stack.pop() {
        match frame.value {
            Value::Object(map) => {
                if frame.depth >= max_depth {
                    debug!("JSON depth limit reached at '{}'", frame.path);
                    continue;
                }
                for (key, child) in map.iter().rev() {
                    stack.push(Frame {
                        value: child,
                        key: key.clone(),
                        path: join_key(&frame.path, key),
                        parent: frame.path.clone(),
                        depth: frame.depth + 1,
                    });
                }
            }
            Value::Array(items) => {
                if frame.depth >= max_depth {
                    debug!("JSON depth limit reached at '{}'", frame.path);
                    continue;
                }
                for (index, child) in items.iter().enumerate().rev() {
                    stack.push(Frame {
                        value: child,
                        key: frame.key.clone(),
                        path: format!("{}[{}]", frame.path, index),
                        parent: frame.path.clone(),
                        depth: frame.depth + 1,
                    });
                }
            }
            Value::Null => {}
            scalar => {
                let (raw, value) = match scalar {
                    Value::Bool(b) => (b.to_string(), FieldValue::Boolean(*b)),
                    Value::Number(n) => {
                        let value = match n.as_i64() {
                            Some(i) => FieldValue::Integer(i),
                            None => FieldValue::Float(n.as_f64().unwrap_or(0.0)),
                        };
                        (n.to_string(), value)
                    }
                    Value::String(s) => (s.clone(), FieldValue::infer(s)),
                    _ => continue,
                };
                // Array elements inherit the array's key; a bare root array has none.
                let key = if frame.key.is_empty() {
                    frame.path.clone()
                } else {
                    frame.key.clone()
                };
                entries.push(FieldEntry::new(
                    key,
                    raw,
                    value,
                    Location::json(frame.path),
                    Origin::JsonKey,
                    frame.parent,
                ));
            }
        }
    }

    entries
}
