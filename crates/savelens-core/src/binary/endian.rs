use super::ByteOrder;

/// Words examined at most; enough to characterise a save file
const MAX_WORDS: usize = 16_384;
/// Minimum share of the evidence the winning order needs
const MIN_SHARE: f64 = 0.6;

/// Guess the dominant byte order from zero-byte placement and small integers.
///
/// Returns `None` when the evidence is thin or balanced.
pub fn guess_byte_order(bytes: &[u8]) -> Option<ByteOrder> {
    let mut le_score: u32 = 0;
    let mut be_score: u32 = 0;

    for chunk in bytes.chunks_exact(4).take(MAX_WORDS) {
        let word = [chunk[0], chunk[1], chunk[2], chunk[3]];
        if word == [0; 4] {
            continue;
        }

        // High bytes of small values are zero
        if word[0] == 0 && word[1] == 0 {
            be_score = be_score.saturating_add(1);
        }
        if word[2] == 0 && word[3] == 0 {
            le_score = le_score.saturating_add(1);
        }

        if (1..=65_535).contains(&u32::from_le_bytes(word)) {
            le_score = le_score.saturating_add(2);
        }
        if (1..=65_535).contains(&u32::from_be_bytes(word)) {
            be_score = be_score.saturating_add(2);
        }
    }

    let total = (le_score + be_score) as f64;
    if total < 3.0 {
        return None;
    }
    if le_score as f64 / total >= MIN_SHARE {
        Some(ByteOrder::Le)
    } else if be_score as f64 / total >= MIN_SHARE {
        Some(ByteOrder::Be)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_words() {
        let bytes: Vec<u8> = [5000u32, 10, 2500, 77]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        assert_eq!(guess_byte_order(&bytes), Some(ByteOrder::Le));
    }

    #[test]
    fn test_big_endian_words() {
        let bytes: Vec<u8> = [5000u32, 10, 2500, 77]
            .iter()
            .flat_map(|v| v.to_be_bytes())
            .collect();
        assert_eq!(guess_byte_order(&bytes), Some(ByteOrder::Be));
    }

    #[test]
    fn test_no_evidence() {
        assert_eq!(guess_byte_order(&[0u8; 64]), None);
        assert_eq!(guess_byte_order(&[1, 2]), None);
    }
}
