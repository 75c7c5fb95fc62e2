use std::sync::LazyLock;

use regex::Regex;

use super::{FieldEntry, FieldValue, Origin};
use crate::model::Location;

/// A word followed (after optional punctuation) by a number: `Gold: 120`, `level 5`
static LABELLED_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z][A-Za-z_]{1,31})[\s:=\-]{0,3}(-?\d+(?:\.\d+)?)\b")
        .expect("valid labelled number pattern")
});

/// Numbers preceded by a word in free text; the word becomes the key.
pub(crate) fn walk(text: &str) -> Vec<FieldEntry> {
    let mut entries = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        for caps in LABELLED_NUMBER.captures_iter(line) {
            let (Some(word), Some(number)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            entries.push(FieldEntry::new(
                word.as_str(),
                number.as_str(),
                FieldValue::infer(number.as_str()),
                Location::line(index + 1, None),
                Origin::PlainText,
                line.trim(),
            ));
        }
    }
    entries
}
