use std::sync::LazyLock;

use regex::Regex;

use crate::model::Location;
use crate::walker::{FieldEntry, FieldValue, Origin};

static EMBEDDED_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z_][A-Za-z0-9_.\-]{1,63})\s*[=:]\s*([A-Za-z0-9_.+\-]{1,64})")
        .expect("valid embedded pair pattern")
});

fn is_printable(byte: u8) -> bool {
    byte.is_ascii_graphic() || byte == b' ' || byte == b'\t'
}

/// Maximal runs of printable ASCII at least `min_len` bytes long, as `(start, text)`
pub fn printable_runs(bytes: &[u8], min_len: usize) -> Vec<(usize, &str)> {
    let mut runs = Vec::new();
    let mut start = None;

    for (i, &byte) in bytes.iter().enumerate() {
        match (is_printable(byte), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                push_run(&mut runs, bytes, s, i, min_len);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        push_run(&mut runs, bytes, s, bytes.len(), min_len);
    }
    runs
}

fn push_run<'a>(
    runs: &mut Vec<(usize, &'a str)>,
    bytes: &'a [u8],
    start: usize,
    end: usize,
    min_len: usize,
) {
    if end - start < min_len {
        return;
    }
    // Printable ASCII is always valid UTF-8
    if let Ok(text) = std::str::from_utf8(&bytes[start..end]) {
        runs.push((start, text));
    }
}

/// `key=value` / `key:value` text inside binary data.
///
/// Each value is located by its absolute byte offset in the buffer.
pub fn embedded_entries(bytes: &[u8], min_run: usize) -> Vec<FieldEntry> {
    let mut entries = Vec::new();
    for (start, text) in printable_runs(bytes, min_run) {
        for caps in EMBEDDED_PAIR.captures_iter(text) {
            let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            entries.push(FieldEntry::new(
                key.as_str(),
                value.as_str(),
                FieldValue::infer(value.as_str()),
                Location::Embedded {
                    offset: start + value.start(),
                },
                Origin::EmbeddedText,
                text.trim(),
            ));
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_runs() {
        let bytes = b"\x00\x01abc\x00hello world\xFFxyz1";
        let runs = printable_runs(bytes, 4);
        assert_eq!(runs, vec![(6, "hello world"), (18, "xyz1")]);
    }

    #[test]
    fn test_embedded_entries() {
        let mut bytes = vec![0u8; 8];
        bytes.extend_from_slice(b"lives:3 gems = 40");
        bytes.push(0);
        bytes.extend_from_slice(b"ab=1");

        let entries = embedded_entries(&bytes, 4);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].key, "lives");
        assert_eq!(entries[0].location, Location::Embedded { offset: 14 });
        assert_eq!(entries[1].key, "gems");
        assert_eq!(entries[1].value, FieldValue::Integer(40));
        assert_eq!(&bytes[23..25], b"40");
        assert_eq!(entries[1].location, Location::Embedded { offset: 23 });
        assert_eq!(entries[2].key, "ab");
    }

    #[test]
    fn test_short_runs_ignored() {
        assert!(embedded_entries(b"\x00a=1\x00", 4).is_empty());
    }
}
