//! Best-effort text decoding under a prioritized charset list.

use encoding_rs::mem::{decode_latin1 as latin1_to_str, encode_latin1_lossy, is_str_latin1};
use encoding_rs::{UTF_8, UTF_16BE, UTF_16LE};
use serde::Serialize;

/// Charset a text file was decoded with; also used to encode it back on rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextEncoding {
    Utf8 { bom: bool },
    Utf16Le { bom: bool },
    Utf16Be { bom: bool },
    Latin1,
}

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Utf8 { .. } => "UTF-8",
            Self::Utf16Le { .. } | Self::Utf16Be { .. } => "UTF-16",
            Self::Latin1 => "ISO-8859-1",
        }
    }

    /// Encode text back into this charset, restoring a byte order mark if the
    /// source had one. Characters Latin-1 cannot represent become `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 { bom } => {
                let mut out = Vec::with_capacity(text.len() + 3);
                if *bom {
                    out.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
                }
                out.extend_from_slice(text.as_bytes());
                out
            }
            Self::Utf16Le { bom } => {
                let mut out = Vec::with_capacity(text.len() * 2 + 2);
                if *bom {
                    out.extend_from_slice(&[0xFF, 0xFE]);
                }
                out.extend(text.encode_utf16().flat_map(|u| u.to_le_bytes()));
                out
            }
            Self::Utf16Be { bom } => {
                let mut out = Vec::with_capacity(text.len() * 2 + 2);
                if *bom {
                    out.extend_from_slice(&[0xFE, 0xFF]);
                }
                out.extend(text.encode_utf16().flat_map(|u| u.to_be_bytes()));
                out
            }
            Self::Latin1 if is_str_latin1(text) => encode_latin1_lossy(text).into_owned(),
            Self::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: TextEncoding,
}

/// Share of letters, digits, whitespace and ASCII punctuation in `text`.
pub fn printable_ratio(text: &str) -> f64 {
    let mut total = 0usize;
    let mut printable = 0usize;
    for c in text.chars() {
        total += 1;
        if c.is_alphanumeric() || c.is_whitespace() || c.is_ascii_punctuation() {
            printable += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        printable as f64 / total as f64
    }
}

/// Try UTF-8, UTF-16 and ISO-8859-1 in that order and return the first
/// decoding whose printable ratio exceeds `min_ratio`.
///
/// US-ASCII needs no attempt of its own: ASCII bytes always decode as UTF-8.
pub fn decode_text(bytes: &[u8], min_ratio: f64) -> Option<DecodedText> {
    if bytes.is_empty() {
        return None;
    }

    let attempts: [fn(&[u8]) -> Option<DecodedText>; 3] =
        [decode_utf8, decode_utf16, decode_latin1];

    attempts
        .iter()
        .filter_map(|attempt| attempt(bytes))
        .find(|decoded| printable_ratio(&decoded.text) > min_ratio)
}

fn decode_utf8(bytes: &[u8]) -> Option<DecodedText> {
    let (body, bom) = match bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        Some(rest) => (rest, true),
        None => (bytes, false),
    };
    let text = UTF_8.decode_without_bom_handling_and_without_replacement(body)?;
    Some(DecodedText {
        text: text.into_owned(),
        encoding: TextEncoding::Utf8 { bom },
    })
}

/// UTF-16 is only attempted with a byte order mark, or when the zero bytes
/// line up with the high half of ASCII code units.
fn decode_utf16(bytes: &[u8]) -> Option<DecodedText> {
    if let Some(body) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        let text = UTF_16LE.decode_without_bom_handling_and_without_replacement(body)?;
        return Some(DecodedText {
            text: text.into_owned(),
            encoding: TextEncoding::Utf16Le { bom: true },
        });
    }
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let text = UTF_16BE.decode_without_bom_handling_and_without_replacement(body)?;
        return Some(DecodedText {
            text: text.into_owned(),
            encoding: TextEncoding::Utf16Be { bom: true },
        });
    }

    if bytes.len() < 4 || bytes.len() % 2 != 0 {
        return None;
    }
    let pairs = bytes.len() / 2;
    let even_zeros = bytes.iter().step_by(2).filter(|&&b| b == 0).count();
    let odd_zeros = bytes.iter().skip(1).step_by(2).filter(|&&b| b == 0).count();
    let mostly = |zeros: usize| zeros * 10 >= pairs * 4;
    let rarely = |zeros: usize| zeros * 20 <= pairs;

    let (encoding, decoder) = if mostly(odd_zeros) && rarely(even_zeros) {
        (TextEncoding::Utf16Le { bom: false }, UTF_16LE)
    } else if mostly(even_zeros) && rarely(odd_zeros) {
        (TextEncoding::Utf16Be { bom: false }, UTF_16BE)
    } else {
        return None;
    };

    let text = decoder.decode_without_bom_handling_and_without_replacement(bytes)?;
    Some(DecodedText {
        text: text.into_owned(),
        encoding,
    })
}

/// Byte-for-code-point ISO-8859-1; encoding_rs labels map this name to
/// windows-1252, so the `mem` conversions are used instead.
fn decode_latin1(bytes: &[u8]) -> Option<DecodedText> {
    Some(DecodedText {
        text: latin1_to_str(bytes).into_owned(),
        encoding: TextEncoding::Latin1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_ratio() {
        assert_eq!(printable_ratio(""), 0.0);
        assert_eq!(printable_ratio("gold=100\n"), 1.0);
        assert!(printable_ratio("a\u{0}\u{0}\u{0}") < 0.5);
    }

    #[test]
    fn test_decode_utf8() {
        let decoded = decode_text(b"{\"gold\": 5}", 0.7).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Utf8 { bom: false });
        assert_eq!(decoded.text, "{\"gold\": 5}");
    }

    #[test]
    fn test_decode_utf8_with_bom() {
        let decoded = decode_text(b"\xEF\xBB\xBFlevel=3", 0.7).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Utf8 { bom: true });
        assert_eq!(decoded.text, "level=3");
        assert_eq!(decoded.encoding.encode(&decoded.text), b"\xEF\xBB\xBFlevel=3");
    }

    #[test]
    fn test_decode_utf16_without_bom() {
        let bytes: Vec<u8> = "gold=500".encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        let decoded = decode_text(&bytes, 0.7).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Utf16Le { bom: false });
        assert_eq!(decoded.text, "gold=500");
        assert_eq!(decoded.encoding.encode(&decoded.text), bytes);
    }

    #[test]
    fn test_decode_utf16_be_with_bom() {
        let mut bytes = vec![0xFE, 0xFF];
        bytes.extend("hp: 90".encode_utf16().flat_map(|u| u.to_be_bytes()));
        let decoded = decode_text(&bytes, 0.7).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Utf16Be { bom: true });
        assert_eq!(decoded.text, "hp: 90");
    }

    #[test]
    fn test_decode_latin1() {
        let decoded = decode_text(b"name=Jos\xE9\nlevel=4", 0.7).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Latin1);
        assert_eq!(decoded.text, "name=José\nlevel=4");
        assert_eq!(decoded.encoding.encode(&decoded.text), b"name=Jos\xE9\nlevel=4");
    }

    #[test]
    fn test_latin1_is_not_windows_1252() {
        let decoded = decode_latin1(b"cost \x80\xA3").unwrap();
        assert_eq!(decoded.text, "cost \u{80}\u{a3}");
        assert_eq!(decoded.encoding.encode(&decoded.text), b"cost \x80\xA3");
        assert_eq!(TextEncoding::Latin1.encode("gold \u{20ac}5"), b"gold ?5");
    }

    #[test]
    fn test_ascii_decodes_as_utf8() {
        let decoded = decode_text(b"lives=3", 0.7).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Utf8 { bom: false });
    }

    #[test]
    fn test_binary_is_not_text() {
        let bytes = [
            0x00, 0x00, 0x13, 0x88, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x09, 0xC4, 0xFF, 0xFF,
            0xFF, 0xFF,
        ];
        assert!(decode_text(&bytes, 0.7).is_none());
        assert!(decode_text(&[], 0.7).is_none());
    }
}
