//! Keyword and range classification of a single key/value pair.
//!
//! A key is matched against weighted keyword tables; several categories may
//! match and the strongest one wins. Value magnitude nudges the decision
//! (small integers look like levels, mid-sized ones like currency) and the
//! surrounding context earns a small bonus when it names game state.

mod keywords;
mod range;

use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::model::Category;
use crate::walker::FieldValue;

pub use keywords::{
    CONTEXT_KEYWORDS, KEYWORD_TABLES, KeywordTable, context_hits, keyword_hits, normalize_key,
    tokens,
};
pub use range::{RangeAssessment, assess, is_round};

/// Extra score per additional keyword of the winning category
const EXTRA_HIT_BONUS: f64 = 0.05;
/// Extra score when the value range agrees with the keyword category
const RANGE_AGREEMENT_BONUS: f64 = 0.1;
const CONTEXT_HIT_SCORE: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub category: Category,
    /// Strength of the keyword match in [0, 1]; zero when no keyword matched
    pub keyword_score: f64,
    pub range: RangeAssessment,
    pub context_score: f64,
}

impl Classification {
    pub fn matched_keyword(&self) -> bool {
        self.keyword_score > 0.0
    }
}

pub struct Classifier<'a> {
    overrides: &'a BTreeMap<Category, f64>,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            overrides: &config.category_weights,
        }
    }

    fn weight(&self, table: &KeywordTable) -> f64 {
        self.overrides
            .get(&table.category)
            .copied()
            .unwrap_or(table.weight)
    }

    pub fn classify(&self, key: &str, value: &FieldValue, context: &str) -> Classification {
        let range = assess(value);

        let mut best: Option<(Category, f64)> = None;
        for (table, hits) in keyword_hits(key) {
            let mut score = self.weight(table) + EXTRA_HIT_BONUS * (hits - 1) as f64;
            if range.bias == Some(table.category) {
                score += RANGE_AGREEMENT_BONUS;
            }
            let score = score.clamp(0.0, 1.0);
            // Ties keep the earlier (more distinctive) table
            if best.is_none_or(|(_, current)| score > current) {
                best = Some((table.category, score));
            }
        }

        let (category, keyword_score) =
            best.unwrap_or((range.bias.unwrap_or(Category::Unknown), 0.0));
        let context_score = (context_hits(context) as f64 * CONTEXT_HIT_SCORE).min(1.0);

        Classification {
            category,
            keyword_score,
            range,
            context_score,
        }
    }
}

/// `(category, base confidence)` for a key/value pair with default weights.
pub fn classify_key(key: &str, value: &FieldValue, context: &str) -> (Category, f64) {
    let config = EngineConfig::default();
    let classification = Classifier::new(&config).classify(key, value, context);
    let weights = &config.weights;
    let base = crate::scoring::fuse(
        weights,
        &crate::scoring::Signals::from_classification(&classification),
    );
    (classification.category, base)
}
