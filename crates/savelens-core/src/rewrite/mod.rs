//! Safe, type-checked rewriting of a single candidate.
//!
//! Validate, locate, convert, splice, commit. The new file content is built
//! completely in memory and only then written back in one piece, so a failure
//! at any stage leaves the original bytes untouched.

mod binary;
mod json;
mod lines;
mod xml;

use std::path::Path;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::io::{FileAccess, FsAccess};
use crate::model::{Candidate, DataType, Location};
use crate::sniff::{DecodedText, decode_text};

/// Same printable threshold analysis decodes with
const TEXT_RATIO: f64 = 0.7;

/// Whether `value` is acceptable for `data_type`.
///
/// Booleans are `true`/`false` in any letter case; no other aliases.
pub fn validate(value: &str, data_type: DataType) -> bool {
    match data_type.base_type() {
        DataType::Integer => value.parse::<i64>().is_ok(),
        DataType::Float => value.parse::<f64>().is_ok_and(f64::is_finite),
        DataType::Boolean => {
            value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
        }
        _ => true,
    }
}

fn decode(bytes: &[u8], location: &Location) -> Result<DecodedText> {
    decode_text(bytes, TEXT_RATIO)
        .or_else(|| decode_text(bytes, 0.0))
        .ok_or_else(|| Error::NotRewritable(location.to_string()))
}

/// Produce the new file content with one value replaced.
pub fn rewrite_bytes(bytes: &[u8], candidate: &Candidate, new_value: &str) -> Result<Vec<u8>> {
    if !validate(new_value, candidate.data_type) {
        return Err(Error::InvalidValue {
            value: new_value.to_string(),
            data_type: candidate.data_type,
        });
    }
    let current = candidate.current_value();

    match &candidate.location {
        Location::Json { path } => {
            let decoded = decode(bytes, &candidate.location)?;
            let text = json::rewrite(
                &decoded.text,
                path,
                &candidate.key,
                new_value,
                candidate.data_type,
            )?;
            Ok(decoded.encoding.encode(&text))
        }
        Location::Line { line, .. } => {
            let decoded = decode(bytes, &candidate.location)?;
            let text = lines::rewrite(&decoded.text, *line, &candidate.key, current, new_value)?;
            Ok(decoded.encoding.encode(&text))
        }
        Location::Xml { node, position } => {
            let decoded = decode(bytes, &candidate.location)?;
            let text = xml::rewrite(&decoded.text, *node, *position, current, new_value)?;
            Ok(decoded.encoding.encode(&text))
        }
        Location::Offset { offset } => binary::rewrite_number(
            bytes,
            *offset,
            &candidate.key,
            new_value,
            candidate.data_type,
        ),
        Location::Embedded { offset } => {
            binary::rewrite_embedded(bytes, *offset, current, new_value)
        }
        Location::Pattern { .. } => Err(Error::NotRewritable(candidate.location.to_string())),
    }
}

/// Applies rewrites through a [`FileAccess`] collaborator.
pub struct Rewriter<'a, A: FileAccess + ?Sized> {
    access: &'a A,
}

impl<'a, A: FileAccess + ?Sized> Rewriter<'a, A> {
    pub fn new(access: &'a A) -> Self {
        Self { access }
    }

    pub fn try_rewrite(&self, path: &Path, candidate: &Candidate, new_value: &str) -> Result<()> {
        if !self.access.can_read(path) {
            return Err(Error::NotReadable(path.display().to_string()));
        }
        if !self.access.can_write(path) {
            return Err(Error::NotWritable(path.display().to_string()));
        }

        let bytes = self.access.read_bytes(path)?;
        let updated = rewrite_bytes(&bytes, candidate, new_value)?;
        self.access.write_bytes(path, &updated)?;

        info!(
            "Rewrote {} at {} in {}: {} -> {}",
            candidate.key,
            candidate.location,
            path.display(),
            candidate.current_value(),
            new_value
        );
        Ok(())
    }

    /// Same as [`Self::try_rewrite`], reporting failure as `false`.
    pub fn rewrite(&self, path: &Path, candidate: &Candidate, new_value: &str) -> bool {
        match self.try_rewrite(path, candidate, new_value) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "Rewrite of {} at {} failed: {}",
                    candidate.key, candidate.location, e
                );
                false
            }
        }
    }
}

/// Rewrite a file on the local filesystem.
pub fn rewrite<P: AsRef<Path>>(path: P, candidate: &Candidate, new_value: &str) -> bool {
    Rewriter::new(&FsAccess).rewrite(path.as_ref(), candidate, new_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryAccess;
    use crate::model::{Category, XmlNode};

    fn candidate(key: &str, raw: &str, data_type: DataType, location: Location) -> Candidate {
        Candidate::new(key, raw, data_type, Category::Unknown, 0.5, location)
    }

    #[test]
    fn test_validate() {
        assert!(!validate("12.5", DataType::Integer));
        assert!(validate("12", DataType::Float));
        assert!(validate("true", DataType::Boolean));
        assert!(validate("FALSE", DataType::Boolean));
        assert!(!validate("maybe", DataType::Boolean));
        assert!(!validate("yes", DataType::Boolean));
        assert!(validate("", DataType::String));
        assert!(validate("-40", DataType::Currency));
        assert!(!validate("NaN", DataType::Float));
        assert!(!validate("", DataType::Integer));
    }

    #[test]
    fn test_invalid_value_leaves_file() {
        let access = MemoryAccess::new().with_file("save.ini", b"gold=5\n".to_vec());
        let path = Path::new("save.ini");
        let c = candidate("gold", "5", DataType::Integer, Location::line(1, None));
        assert!(!Rewriter::new(&access).rewrite(path, &c, "lots"));
        assert_eq!(access.get(path).unwrap(), b"gold=5\n");
    }

    #[test]
    fn test_read_only_file() {
        let access = MemoryAccess::new().with_file("save.ini", b"gold=5\n".to_vec());
        access.set_read_only("save.ini");
        let path = Path::new("save.ini");
        let c = candidate("gold", "5", DataType::Integer, Location::line(1, None));
        let err = Rewriter::new(&access).try_rewrite(path, &c, "6").unwrap_err();
        assert!(matches!(err, Error::NotWritable(_)));
    }

    #[test]
    fn test_missing_file() {
        let access = MemoryAccess::new();
        let c = candidate("gold", "5", DataType::Integer, Location::line(1, None));
        assert!(!Rewriter::new(&access).rewrite(Path::new("nope"), &c, "6"));
    }

    #[test]
    fn test_pattern_candidates_are_not_rewritable() {
        let c = candidate(
            "pattern_sum_relationship",
            "1, 2, 3",
            DataType::String,
            Location::Pattern {
                name: "sum_relationship".to_string(),
            },
        );
        assert!(matches!(
            rewrite_bytes(b"1 2 3", &c, "x"),
            Err(Error::NotRewritable(_))
        ));
    }

    #[test]
    fn test_utf16_text_keeps_encoding() {
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend("gold=5\n".encode_utf16().flat_map(|u| u.to_le_bytes()));
        let c = candidate("gold", "5", DataType::Integer, Location::line(1, None));
        let out = rewrite_bytes(&bytes, &c, "42").unwrap();

        let mut expected = vec![0xFF, 0xFE];
        expected.extend("gold=42\n".encode_utf16().flat_map(|u| u.to_le_bytes()));
        assert_eq!(out, expected);
    }

    #[test]
    fn test_xml_and_edit_original() {
        let text = r#"<map><int name="gold" value="500" /></map>"#;
        let position = text.find("500").unwrap();
        let c = candidate(
            "gold",
            "500",
            DataType::Integer,
            Location::Xml {
                node: XmlNode::Preference,
                position,
            },
        )
        .with_edit("750");
        let out = rewrite_bytes(text.as_bytes(), &c, "750").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"<map><int name="gold" value="750" /></map>"#
        );
    }
}
