//! Statistical pattern detection over all numbers found in one file.
//!
//! Unlike keyword classification this looks at the population: a run of
//! consecutive integers suggests levels, a geometric series suggests an
//! experience table. Findings become synthetic candidates anchored at the
//! most representative (median) value.

mod scorers;

use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};
use tracing::debug;

use crate::config::EngineConfig;
use crate::model::{Candidate, Category, DataType, Location};
use crate::walker::FieldEntry;

pub use scorers::{is_integral, is_power_of_two};

/// Minimum sequence length for any detector
pub const MIN_VALUES: usize = 3;
/// Curve detection needs more points to be meaningful
pub const MIN_CURVE_VALUES: usize = 4;
/// How many related values a relationship candidate lists
const RELATED_PREVIEW: usize = 5;
/// Pattern findings rank below direct keyword evidence
const PATTERN_CONFIDENCE_SCALE: f64 = 0.6;

/// One number with the text around it
#[derive(Debug, Clone, PartialEq)]
pub struct NumericContext {
    pub value: f64,
    /// Value text as it appears in the file
    pub raw: String,
    pub location: Location,
    pub text_before: String,
    pub text_after: String,
}

impl NumericContext {
    /// Numeric leaves only; text and booleans are skipped.
    pub fn from_entry(entry: &FieldEntry) -> Option<Self> {
        let value = entry.value.as_f64()?;
        Some(Self {
            value,
            raw: entry.raw.clone(),
            location: entry.location.clone(),
            text_before: entry.key.clone(),
            text_after: entry.context.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum PatternKind {
    CurrencyProgression,
    LevelSequence,
    ExperienceCurve,
    Percentage,
    RoundNumbers,
    FibonacciLike,
    PowerOfTwo,
    HealthMana,
    AchievementScores,
    InventoryQuantities,
    SumRelationship,
    RatioRelationship,
    DifferenceRelationship,
    ProductRelationship,
}

impl PatternKind {
    pub fn is_relationship(&self) -> bool {
        matches!(
            self,
            Self::SumRelationship
                | Self::RatioRelationship
                | Self::DifferenceRelationship
                | Self::ProductRelationship
        )
    }

    pub fn min_values(&self) -> usize {
        match self {
            Self::ExperienceCurve => MIN_CURVE_VALUES,
            _ => MIN_VALUES,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::CurrencyProgression | Self::RoundNumbers => Category::Currency,
            Self::LevelSequence | Self::Percentage => Category::Progress,
            Self::ExperienceCurve | Self::FibonacciLike => Category::Experience,
            Self::PowerOfTwo | Self::InventoryQuantities => Category::Inventory,
            Self::HealthMana => Category::HealthEnergy,
            Self::AchievementScores => Category::Achievements,
            Self::SumRelationship
            | Self::RatioRelationship
            | Self::DifferenceRelationship
            | Self::ProductRelationship => Category::Relationships,
        }
    }

    fn score(&self, values: &[f64]) -> f64 {
        let score = match self {
            Self::CurrencyProgression => scorers::currency_progression(values),
            Self::LevelSequence => scorers::level_sequence(values),
            Self::ExperienceCurve => scorers::experience_curve(values),
            Self::Percentage => scorers::percentage(values),
            Self::RoundNumbers => scorers::round_numbers(values),
            Self::FibonacciLike => scorers::fibonacci_like(values),
            Self::PowerOfTwo => scorers::power_of_two(values),
            Self::HealthMana => scorers::health_mana(values),
            Self::AchievementScores => scorers::achievement_scores(values),
            Self::InventoryQuantities => scorers::inventory_quantities(values),
            Self::SumRelationship => scorers::sum_relationship(values),
            Self::RatioRelationship => scorers::ratio_relationship(values),
            Self::DifferenceRelationship => scorers::difference_relationship(values),
            Self::ProductRelationship => scorers::product_relationship(values),
        };
        if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    pub kind: PatternKind,
    pub score: f64,
    /// Median of the sequence (lower middle for even lengths)
    pub representative: f64,
}

fn lower_median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.get(sorted.len().checked_sub(1)? / 2).copied()
}

/// Score every detector that has enough values; zero scores are dropped.
pub fn detect(values: &[f64]) -> Vec<PatternMatch> {
    let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let Some(representative) = lower_median(&values) else {
        return Vec::new();
    };
    if values.len() < MIN_VALUES {
        return Vec::new();
    }

    PatternKind::iter()
        .filter(|kind| values.len() >= kind.min_values())
        .filter_map(|kind| {
            let score = kind.score(&values);
            (score > 0.0).then_some(PatternMatch {
                kind,
                score,
                representative,
            })
        })
        .collect()
}

pub struct PatternDetector<'a> {
    config: &'a EngineConfig,
}

impl<'a> PatternDetector<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    fn threshold(&self, kind: PatternKind) -> f64 {
        if kind.is_relationship() {
            self.config.relationship_threshold
        } else {
            self.config.pattern_threshold
        }
    }

    /// Synthetic candidates for every detector above its threshold.
    pub fn candidates(&self, contexts: &[NumericContext]) -> Vec<Candidate> {
        let values: Vec<f64> = contexts.iter().map(|c| c.value).collect();
        let matches = detect(&values);
        debug!(
            "Pattern detection over {} values: {} detector hits",
            values.len(),
            matches.len()
        );

        matches
            .into_iter()
            .filter(|m| m.score > self.threshold(m.kind))
            .filter_map(|m| {
                if m.kind.is_relationship() {
                    Some(relationship_candidate(&m, contexts))
                } else {
                    pattern_candidate(&m, contexts)
                }
            })
            .collect()
    }
}

fn pattern_candidate(found: &PatternMatch, contexts: &[NumericContext]) -> Option<Candidate> {
    // The median is always one of the inputs; anchor the candidate there so
    // it can be rewritten like any other value.
    let anchor = contexts.iter().find(|c| c.value == found.representative)?;
    let data_type = if is_integral(anchor.value) {
        DataType::Integer
    } else {
        DataType::Float
    };
    let category = found.kind.category();
    let description = format!(
        "{} pattern ({}) across {} values, median near '{}'",
        category.label(),
        found.kind,
        contexts.len(),
        anchor.text_before
    );
    Some(
        Candidate::new(
            format!("pattern_{}", found.kind),
            anchor.raw.clone(),
            data_type,
            category,
            found.score * PATTERN_CONFIDENCE_SCALE,
            anchor.location.clone(),
        )
        .with_description(description),
    )
}

fn relationship_candidate(found: &PatternMatch, contexts: &[NumericContext]) -> Candidate {
    let related = contexts
        .iter()
        .take(RELATED_PREVIEW)
        .map(|c| c.raw.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let description = format!(
        "Values related by {} across {} values",
        found.kind,
        contexts.len()
    );
    Candidate::new(
        format!("pattern_{}", found.kind),
        related,
        DataType::String,
        Category::Relationships,
        found.score * PATTERN_CONFIDENCE_SCALE,
        Location::Pattern {
            name: found.kind.to_string(),
        },
    )
    .with_description(description)
}
