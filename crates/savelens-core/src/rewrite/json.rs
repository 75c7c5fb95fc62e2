use std::collections::VecDeque;

use serde_json::{Number, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::DataType;
use crate::walker::parse_json_tolerant;

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathStep {
    Key(String),
    Index(usize),
}

/// Split `player.items[2].count` or `save["a.b"]` into steps; `None` if the
/// path is malformed.
fn parse_path(path: &str) -> Option<Vec<PathStep>> {
    let mut steps = Vec::new();
    let mut rest = path;
    while !rest.is_empty() {
        if let Some(inner) = rest.strip_prefix('[') {
            if inner.starts_with('"') {
                let mut stream = serde_json::Deserializer::from_str(inner).into_iter::<String>();
                let key = stream.next()?.ok()?;
                rest = inner[stream.byte_offset()..].strip_prefix(']')?;
                steps.push(PathStep::Key(key));
            } else {
                let end = inner.find(']')?;
                steps.push(PathStep::Index(inner[..end].parse().ok()?));
                rest = &inner[end + 1..];
            }
            continue;
        }

        let segment = if steps.is_empty() {
            rest
        } else {
            rest.strip_prefix('.')?
        };
        let end = segment.find(['.', '[']).unwrap_or(segment.len());
        if end == 0 {
            return None;
        }
        steps.push(PathStep::Key(segment[..end].to_string()));
        rest = &segment[end..];
    }
    Some(steps)
}

fn resolve_mut<'v>(root: &'v mut Value, steps: &[PathStep]) -> Option<&'v mut Value> {
    steps.iter().try_fold(root, |node, step| match step {
        PathStep::Key(key) => node.as_object_mut()?.get_mut(key),
        PathStep::Index(index) => node.as_array_mut()?.get_mut(*index),
    })
}

/// Path to the first object (breadth-first) that has `key` with a scalar value
fn find_key(root: &Value, key: &str) -> Option<Vec<PathStep>> {
    let mut queue: VecDeque<(&Value, Vec<PathStep>)> = VecDeque::from([(root, Vec::new())]);
    while let Some((node, path)) = queue.pop_front() {
        match node {
            Value::Object(map) => {
                if let Some(value) = map.get(key)
                    && is_scalar(value)
                {
                    let mut found = path;
                    found.push(PathStep::Key(key.to_string()));
                    return Some(found);
                }
                for (name, child) in map {
                    let mut next = path.clone();
                    next.push(PathStep::Key(name.clone()));
                    queue.push_back((child, next));
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    let mut next = path.clone();
                    next.push(PathStep::Index(index));
                    queue.push_back((child, next));
                }
            }
            _ => {}
        }
    }
    None
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

/// Replacement node; a value stored as a JSON string stays a string.
fn typed_value(existing: &Value, new_value: &str, data_type: DataType) -> Result<Value> {
    let invalid = || Error::InvalidValue {
        value: new_value.to_string(),
        data_type,
    };
    if existing.is_string() {
        return Ok(Value::String(new_value.to_string()));
    }
    match data_type.base_type() {
        DataType::Integer => new_value
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| invalid()),
        DataType::Float => {
            let parsed: f64 = new_value.trim().parse().map_err(|_| invalid())?;
            Number::from_f64(parsed)
                .map(Value::Number)
                .ok_or_else(invalid)
        }
        DataType::Boolean => Ok(Value::Bool(new_value.trim().eq_ignore_ascii_case("true"))),
        _ => Ok(Value::String(new_value.to_string())),
    }
}

/// Replace one scalar and re-serialize the whole document, pretty printed.
///
/// The recorded path is tried first; if it no longer resolves, the first
/// object containing `key` is used instead.
pub(crate) fn rewrite(
    text: &str,
    path: &str,
    key: &str,
    new_value: &str,
    data_type: DataType,
) -> Result<String> {
    let mut root = parse_json_tolerant(text)
        .ok_or_else(|| Error::NotRewritable(format!("JSON {}", path)))?;

    let by_path = parse_path(path)
        .filter(|steps| resolve_mut(&mut root, steps).is_some_and(|node| is_scalar(node)));
    let steps = match by_path {
        Some(steps) => steps,
        None => {
            debug!("JSON path '{}' did not resolve, searching for key '{}'", path, key);
            find_key(&root, key).ok_or_else(|| Error::LocationNotFound(format!("JSON {}", path)))?
        }
    };

    let node = resolve_mut(&mut root, &steps)
        .ok_or_else(|| Error::LocationNotFound(format!("JSON {}", path)))?;
    *node = typed_value(node, new_value, data_type)?;

    Ok(serde_json::to_string_pretty(&root)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path() {
        assert_eq!(
            parse_path("items[2].count"),
            Some(vec![
                PathStep::Key("items".into()),
                PathStep::Index(2),
                PathStep::Key("count".into())
            ])
        );
        assert_eq!(
            parse_path("[0][1]"),
            Some(vec![PathStep::Index(0), PathStep::Index(1)])
        );
        assert_eq!(
            parse_path(r#"a["b.c"][1]"#),
            Some(vec![
                PathStep::Key("a".into()),
                PathStep::Key("b.c".into()),
                PathStep::Index(1)
            ])
        );
        assert_eq!(
            parse_path(r#"["say \"hi\""]"#),
            Some(vec![PathStep::Key("say \"hi\"".into())])
        );
        assert_eq!(parse_path("a..b"), None);
        assert_eq!(parse_path(r#"a["b"c"#), None);
        assert_eq!(parse_path("a[x]"), None);
        assert_eq!(parse_path("a[1]b"), None);
    }

    #[test]
    fn test_rewrite_by_path() {
        let out = rewrite(
            r#"{"player":{"gold":12500,"name":"Hero"}}"#,
            "player.gold",
            "gold",
            "99999",
            DataType::Integer,
        )
        .unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["player"]["gold"], 99999);
        assert_eq!(value["player"]["name"], "Hero");
        // Key order survives re-serialization
        assert!(out.find("gold").unwrap() < out.find("name").unwrap());
    }

    #[test]
    fn test_rewrite_falls_back_to_key_search() {
        let out = rewrite(
            r#"{"meta":{"v":1},"stats":{"hp":{"max":10},"gems":5}}"#,
            "gems",
            "gems",
            "50",
            DataType::Integer,
        )
        .unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["stats"]["gems"], 50);
    }

    #[test]
    fn test_string_nodes_stay_strings() {
        let out = rewrite(
            r#"{"coins":"500"}"#,
            "coins",
            "coins",
            "750",
            DataType::Integer,
        )
        .unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["coins"], "750");
    }

    #[test]
    fn test_typed_values() {
        let out = rewrite(
            r#"{"speed":1.5,"sound":true}"#,
            "sound",
            "sound",
            "False",
            DataType::Boolean,
        )
        .unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["sound"], false);

        let out = rewrite(r#"{"speed":1.5}"#, "speed", "speed", "2.25", DataType::Float).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["speed"], 2.25);
    }

    #[test]
    fn test_quoted_path_picks_dotted_key() {
        let text = r#"{"a.b":1,"a":{"b":2}}"#;
        let out = rewrite(text, r#"["a.b"]"#, "a.b", "9", DataType::Integer).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["a.b"], 9);
        assert_eq!(value["a"]["b"], 2);

        let out = rewrite(text, "a.b", "b", "7", DataType::Integer).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["a.b"], 1);
        assert_eq!(value["a"]["b"], 7);
    }

    #[test]
    fn test_missing_key_fails() {
        let err = rewrite(r#"{"a":1}"#, "b", "b", "2", DataType::Integer).unwrap_err();
        assert!(matches!(err, Error::LocationNotFound(_)));
        let err = rewrite("not json", "a", "a", "2", DataType::Integer).unwrap_err();
        assert!(matches!(err, Error::NotRewritable(_)));
    }
}
