use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use tracing::debug;

use super::{ByteOrder, DecodedNumber, Width};
use crate::classify::assess;
use crate::config::{EngineConfig, FusionWeights};
use crate::scoring::{Signals, alignment_delta, fuse};

/// 64-bit reads only start on 4-byte boundaries
const WIDE_STEP: usize = 4;

const ORDERS: [ByteOrder; 2] = [ByteOrder::Le, ByteOrder::Be];

fn window<const N: usize>(bytes: &[u8], offset: usize) -> Option<[u8; N]> {
    bytes.get(offset..offset + N)?.try_into().ok()
}

struct Bounds {
    int_min: i64,
    int_max: i64,
    float_min: f64,
    float_max: f64,
    epsilon: f64,
}

impl Bounds {
    fn from_config(config: &EngineConfig) -> Self {
        Self {
            // Zero is never a useful hit
            int_min: config.binary_int_min.max(1),
            int_max: config.binary_int_max,
            float_min: config.binary_float_min,
            float_max: config.binary_float_max,
            epsilon: config.binary_float_epsilon,
        }
    }

    fn int(&self, value: i64) -> bool {
        value != 0 && (self.int_min..=self.int_max).contains(&value)
    }

    fn float(&self, value: f64) -> bool {
        value.is_normal()
            && value.abs() >= self.epsilon
            && (self.float_min..=self.float_max).contains(&value)
    }
}

fn read(
    bytes: &[u8],
    offset: usize,
    width: Width,
    order: ByteOrder,
    bounds: &Bounds,
) -> Option<DecodedNumber> {
    match width {
        Width::Int32 => {
            let w = window::<4>(bytes, offset)?;
            let value = match order {
                ByteOrder::Le => i32::from_le_bytes(w),
                ByteOrder::Be => i32::from_be_bytes(w),
            } as i64;
            bounds
                .int(value)
                .then(|| DecodedNumber::integer(offset, width, order, value))
        }
        Width::Int64 => {
            let w = window::<8>(bytes, offset)?;
            let value = match order {
                ByteOrder::Le => i64::from_le_bytes(w),
                ByteOrder::Be => i64::from_be_bytes(w),
            };
            bounds
                .int(value)
                .then(|| DecodedNumber::integer(offset, width, order, value))
        }
        Width::Float32 => {
            let w = window::<4>(bytes, offset)?;
            let value = match order {
                ByteOrder::Le => f32::from_le_bytes(w),
                ByteOrder::Be => f32::from_be_bytes(w),
            };
            // Subnormal f32 values widen to normal f64 ones, so check before widening
            (value.is_normal() && bounds.float(value as f64)).then(|| {
                DecodedNumber::float(offset, width, order, value as f64, value.to_string())
            })
        }
        Width::Float64 => {
            let w = window::<8>(bytes, offset)?;
            let value = match order {
                ByteOrder::Le => f64::from_le_bytes(w),
                ByteOrder::Be => f64::from_be_bytes(w),
            };
            bounds
                .float(value)
                .then(|| DecodedNumber::float(offset, width, order, value, value.to_string()))
        }
    }
}

/// A decoded number with its retention priority and scan position
struct Ranked {
    priority: f64,
    seq: usize,
    number: DecodedNumber,
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    /// Higher priority first, then earlier in the scan
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Static part of the confidence a number will get: magnitude, alignment and
/// agreement with the dominant byte order.
fn retention_priority(
    number: &DecodedNumber,
    hint: Option<ByteOrder>,
    weights: &FusionWeights,
) -> f64 {
    let range = assess(&number.value);
    let mut alignment = alignment_delta(weights, number.offset);
    if hint == Some(number.order) {
        alignment += weights.byte_order_bonus;
    }
    fuse(
        weights,
        &Signals {
            range: range.plausibility,
            adjustment: range.adjustment,
            alignment,
            ..Signals::default()
        },
    )
}

/// Every plausible number in the buffer, in offset order.
///
/// 4-byte reads slide one byte at a time to catch unaligned fields; 8-byte
/// reads step by four. The whole buffer is always scanned; past the
/// configured candidate budget the lowest-priority numbers are dropped, so a
/// value near the end of a large file competes on equal terms.
pub fn scan_numbers(
    bytes: &[u8],
    config: &EngineConfig,
    hint: Option<ByteOrder>,
) -> Vec<DecodedNumber> {
    let bounds = Bounds::from_config(config);
    let budget = config.binary_candidate_budget;
    if budget == 0 {
        return Vec::new();
    }

    let mut kept: BinaryHeap<Reverse<Ranked>> = BinaryHeap::with_capacity(budget + 1);
    let mut seq = 0usize;
    for offset in 0..bytes.len() {
        for width in [Width::Int32, Width::Float32, Width::Int64, Width::Float64] {
            if width.size() == 8 && offset % WIDE_STEP != 0 {
                continue;
            }
            for order in ORDERS {
                let Some(number) = read(bytes, offset, width, order, &bounds) else {
                    continue;
                };
                let priority = retention_priority(&number, hint, &config.weights);
                kept.push(Reverse(Ranked {
                    priority,
                    seq,
                    number,
                }));
                seq += 1;
                if kept.len() > budget {
                    kept.pop();
                }
            }
        }
    }

    if seq > budget {
        debug!("Binary scan kept {} of {} plausible numbers", budget, seq);
    }

    let mut ranked: Vec<Ranked> = kept.into_iter().map(|Reverse(ranked)| ranked).collect();
    ranked.sort_by_key(|ranked| ranked.seq);
    ranked.into_iter().map(|ranked| ranked.number).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [u8; 16] = [
        0x00, 0x00, 0x13, 0x88, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x09, 0xC4, 0xFF, 0xFF, 0xFF,
        0xFF,
    ];

    #[test]
    fn test_big_endian_integers() {
        let numbers = scan_numbers(&SAMPLE, &EngineConfig::default(), None);
        let be32: Vec<(usize, &str)> = numbers
            .iter()
            .filter(|n| n.width == Width::Int32 && n.order == ByteOrder::Be && n.offset % 4 == 0)
            .map(|n| (n.offset, n.raw.as_str()))
            .collect();
        assert_eq!(be32, vec![(0, "5000"), (4, "10"), (8, "2500")]);
    }

    #[test]
    fn test_filter_excludes_negative_and_zero() {
        let numbers = scan_numbers(&SAMPLE, &EngineConfig::default(), None);
        assert!(numbers.iter().all(|n| n.value.as_f64().is_some_and(|v| v > 0.0)));

        let zeros = scan_numbers(&[0u8; 32], &EngineConfig::default(), None);
        assert!(zeros.is_empty());
    }

    #[test]
    fn test_little_endian_float() {
        let bytes = 1.5f32.to_le_bytes();
        let numbers = scan_numbers(&bytes, &EngineConfig::default(), None);
        let float = numbers
            .iter()
            .find(|n| n.width == Width::Float32 && n.order == ByteOrder::Le)
            .unwrap();
        assert_eq!(float.raw, "1.5");
        assert_eq!(float.offset, 0);
    }

    #[test]
    fn test_int64_step() {
        let mut bytes = vec![0xAAu8; 4];
        bytes.extend_from_slice(&123_456_i64.to_le_bytes());
        let numbers = scan_numbers(&bytes, &EngineConfig::default(), None);
        assert!(numbers.iter().any(|n| n.width == Width::Int64
            && n.order == ByteOrder::Le
            && n.offset == 4
            && n.raw == "123456"));
        assert!(numbers
            .iter()
            .filter(|n| n.width.size() == 8)
            .all(|n| n.offset % 4 == 0));
    }

    #[test]
    fn test_budget() {
        let bytes: Vec<u8> = (0..64).map(|i| (i % 7 + 1) as u8).collect();
        let mut config = EngineConfig::default();
        config.binary_candidate_budget = 5;
        assert_eq!(scan_numbers(&bytes, &config, None).len(), 5);
    }

    #[test]
    fn test_scans_past_budget_to_end_of_buffer() {
        let mut bytes: Vec<u8> = (0..12_000u32)
            .flat_map(|i| (i % 100 + 1).to_le_bytes())
            .collect();
        bytes.extend_from_slice(&12_500u32.to_le_bytes());
        let config = EngineConfig::default();

        let numbers = scan_numbers(&bytes, &config, Some(ByteOrder::Le));
        assert!(numbers.len() <= config.binary_candidate_budget);
        assert!(numbers.iter().any(|n| n.offset == 48_000
            && n.width == Width::Int32
            && n.order == ByteOrder::Le
            && n.raw == "12500"));
        assert!(numbers.windows(2).all(|w| w[0].offset <= w[1].offset));
    }

    #[test]
    fn test_budget_keeps_aligned_reads() {
        let bytes: Vec<u8> = [300u32, 7, 4000, 12]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let mut config = EngineConfig::default();
        config.binary_candidate_budget = 4;

        let numbers = scan_numbers(&bytes, &config, Some(ByteOrder::Le));
        let kept: Vec<(usize, &str)> = numbers
            .iter()
            .map(|n| (n.offset, n.raw.as_str()))
            .collect();
        assert_eq!(kept, vec![(0, "300"), (4, "7"), (8, "4000"), (12, "12")]);
    }
}
