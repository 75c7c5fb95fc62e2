//! Line-scoped rewriting for key-value and plain-text files.

use crate::error::{Error, Result};
use crate::walker::{KeyValueLine, parse_line};

fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}

/// `key` is either the bare key of the line or `section.key`
fn key_matches(pair: &KeyValueLine<'_>, key: &str) -> bool {
    pair.key == key
        || key
            .strip_suffix(pair.key)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

/// First occurrence of `needle` at or after `from` that is not part of a longer number
fn find_value(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let numeric = needle.chars().next().is_some_and(|c| c.is_ascii_digit() || c == '-');
    let mut start = from;
    while let Some(found) = haystack.get(start..)?.find(needle) {
        let at = start + found;
        let end = at + needle.len();
        let before = haystack[..at].chars().next_back();
        let after = haystack[end..].chars().next();
        if !numeric || (!before.is_some_and(is_number_char) && !after.is_some_and(is_number_char)) {
            return Some(at);
        }
        start = at + needle.len();
    }
    None
}

fn splice(line: &str, start: usize, end: usize, new_value: &str) -> String {
    let mut out = String::with_capacity(line.len() + new_value.len());
    out.push_str(&line[..start]);
    out.push_str(new_value);
    out.push_str(&line[end..]);
    out
}

/// Rewrite the value portion of a `key=value` line, keeping quotes intact.
fn rewrite_pair(line: &str, pair: &KeyValueLine<'_>, current: &str, new_value: &str) -> String {
    let value = &line[pair.value_start..pair.value_end];
    match find_value(value, current, 0) {
        Some(at) => {
            let start = pair.value_start + at;
            splice(line, start, start + current.len(), new_value)
        }
        None => splice(line, pair.value_start, pair.value_end, new_value),
    }
}

fn rewrite_in_line(line: &str, key: &str, current: &str, new_value: &str) -> Option<String> {
    let content = strip_line_ending(line);
    let ending = &line[content.len()..];
    if let Some(pair) = parse_line(content) {
        if key_matches(&pair, key) {
            let rewritten = rewrite_pair(content, &pair, current, new_value);
            return Some(format!("{}{}", rewritten, ending));
        }
        // Other keys: only the value span may change, unless the label is
        // free text that names the key
        if let Some(at) = find_value(&content[pair.value_start..pair.value_end], current, 0) {
            let start = pair.value_start + at;
            let rewritten = splice(content, start, start + current.len(), new_value);
            return Some(format!("{}{}", rewritten, ending));
        }
        if !pair.key.contains(key) {
            return None;
        }
    }

    // Free text: prefer the occurrence after the label
    let from = content.find(key).map(|i| i + key.len()).unwrap_or(0);
    let at = find_value(content, current, from).or_else(|| find_value(content, current, 0))?;
    Some(splice(line, at, at + current.len(), new_value))
}

/// First occurrence of `current` that is not inside a key, as a byte offset into `text`
fn find_outside_keys(text: &str, current: &str) -> Option<usize> {
    let mut base = 0;
    for line in text.split_inclusive('\n') {
        let content = strip_line_ending(line);
        let found = match parse_line(content) {
            Some(pair) => find_value(&content[pair.value_start..pair.value_end], current, 0)
                .map(|at| pair.value_start + at),
            None => find_value(content, current, 0),
        };
        if let Some(at) = found {
            return Some(base + at);
        }
        base += line.len();
    }
    None
}

/// Replace one value in a text file.
///
/// The recorded 1-based line is tried first: a key-value line with the same
/// key has its value replaced, otherwise the current value is replaced inside
/// that line. If the line no longer matches, the first line carrying the key
/// is used, and failing that the first occurrence of the current value that
/// does not sit inside a key. Every other line is kept byte for byte.
pub(crate) fn rewrite(
    text: &str,
    line_number: usize,
    key: &str,
    current: &str,
    new_value: &str,
) -> Result<String> {
    let mut lines: Vec<String> = text.split_inclusive('\n').map(str::to_string).collect();

    let index = line_number.checked_sub(1);
    if let Some(index) = index
        && let Some(line) = lines.get(index)
        && let Some(rewritten) = rewrite_in_line(line, key, current, new_value)
    {
        lines[index] = rewritten;
        return Ok(lines.concat());
    }

    for line in lines.iter_mut() {
        let content = strip_line_ending(line);
        let Some(pair) = parse_line(content) else {
            continue;
        };
        if key_matches(&pair, key) {
            let rewritten = rewrite_pair(content, &pair, current, new_value);
            *line = format!("{}{}", rewritten, &line[content.len()..]);
            return Ok(lines.concat());
        }
    }

    let at = find_outside_keys(text, current)
        .ok_or_else(|| Error::LocationNotFound(format!("Line {} ({})", line_number, key)))?;
    let mut out = String::with_capacity(text.len() + new_value.len());
    out.push_str(&text[..at]);
    out.push_str(new_value);
    out.push_str(&text[at + current.len()..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_line() {
        let out = rewrite(
            "player.gold=5000\nplayer.level=10\n",
            1,
            "player.gold",
            "5000",
            "50000",
        )
        .unwrap();
        assert_eq!(out, "player.gold=50000\nplayer.level=10\n");
    }

    #[test]
    fn test_section_key_and_crlf() {
        let text = "[player]\r\ngold = \"250\"\r\nhp=9\r\n";
        let out = rewrite(text, 2, "player.gold", "250", "999").unwrap();
        assert_eq!(out, "[player]\r\ngold = \"999\"\r\nhp=9\r\n");
    }

    #[test]
    fn test_falls_back_to_key_scan() {
        let text = "a=1\ngold=5\n";
        // Line 1 does not hold the key or the value any more
        let out = rewrite(text, 1, "gold", "5", "6").unwrap();
        assert_eq!(out, "a=1\ngold=6\n");
    }

    #[test]
    fn test_plain_text_line() {
        let text = "Report\nGold 1270 and level 7\n";
        let out = rewrite(text, 2, "level", "7", "8").unwrap();
        assert_eq!(out, "Report\nGold 1270 and level 8\n");

        let out = rewrite(text, 2, "Gold", "1270", "5000").unwrap();
        assert_eq!(out, "Report\nGold 5000 and level 7\n");
    }

    #[test]
    fn test_first_occurrence_fallback() {
        let text = "header\nscore 300\n";
        let out = rewrite(text, 9, "points", "300", "450").unwrap();
        assert_eq!(out, "header\nscore 450\n");
    }

    #[test]
    fn test_unrelated_key_only_touches_value() {
        let text = "a1=1\na2=2\na3=3\n";
        let out = rewrite(text, 2, "pattern_level_sequence", "2", "5").unwrap();
        assert_eq!(out, "a1=1\na2=5\na3=3\n");
    }

    #[test]
    fn test_fallback_skips_keys() {
        let out = rewrite("a2=7\nb=2\n", 9, "missing", "2", "5").unwrap();
        assert_eq!(out, "a2=7\nb=5\n");

        let err = rewrite("x2=7\n", 1, "missing", "2", "5").unwrap_err();
        assert!(matches!(err, Error::LocationNotFound(_)));
    }

    #[test]
    fn test_label_with_separator_later_in_line() {
        let text = "Level 7 reached: yes\n";
        let out = rewrite(text, 1, "Level", "7", "8").unwrap();
        assert_eq!(out, "Level 8 reached: yes\n");
    }

    #[test]
    fn test_not_found() {
        let err = rewrite("x=1\n", 1, "gold", "5", "6").unwrap_err();
        assert!(matches!(err, Error::LocationNotFound(_)));
    }

    #[test]
    fn test_find_value_respects_number_boundaries() {
        assert_eq!(find_value("1270 7", "7", 0), Some(5));
        assert_eq!(find_value("12.5", "2", 0), None);
        assert_eq!(find_value("Hero", "Hero", 0), Some(0));
    }
}
