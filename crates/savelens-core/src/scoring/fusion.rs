use crate::classify::Classification;
use crate::config::FusionWeights;

/// Independent evidence for one candidate.
///
/// `keyword`, `range` and `context` are scores in [0, 1]; the rest are small
/// signed deltas applied as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Signals {
    pub keyword: f64,
    pub range: f64,
    pub context: f64,
    /// Round-number bonus or zero/negative penalty from the range check
    pub adjustment: f64,
    pub frequency: f64,
    /// Byte alignment and byte-order evidence for binary offsets
    pub alignment: f64,
}

impl Signals {
    pub fn from_classification(classification: &Classification) -> Self {
        Self {
            keyword: classification.keyword_score,
            range: classification.range.plausibility,
            context: classification.context_score,
            adjustment: classification.range.adjustment,
            ..Self::default()
        }
    }
}

fn step(current: f64, delta: f64) -> f64 {
    let next = current + delta;
    if next.is_nan() {
        current
    } else {
        next.clamp(0.0, 1.0)
    }
}

fn unit(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// Additive fusion, clamped to [0, 1] after every step.
pub fn fuse(weights: &FusionWeights, signals: &Signals) -> f64 {
    let mut confidence = 0.0;
    confidence = step(confidence, unit(signals.keyword) * weights.keyword);
    confidence = step(confidence, unit(signals.range) * weights.range);
    confidence = step(confidence, unit(signals.context) * weights.context);
    confidence = step(confidence, signals.adjustment);
    confidence = step(confidence, signals.frequency);
    step(confidence, signals.alignment)
}

/// Keys seen exactly once are favoured, keys seen everywhere are penalised.
pub fn frequency_delta(weights: &FusionWeights, occurrences: usize) -> f64 {
    if occurrences == 1 {
        weights.unique_bonus
    } else if occurrences > weights.frequent_threshold {
        -weights.frequent_penalty
    } else {
        0.0
    }
}

pub fn alignment_delta(weights: &FusionWeights, offset: usize) -> f64 {
    if offset % 8 == 0 {
        weights.align8_bonus
    } else if offset % 4 == 0 {
        weights.align4_bonus
    } else {
        -weights.misaligned_penalty
    }
}
