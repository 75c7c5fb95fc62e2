//! Numeric range plausibility.

use crate::model::Category;
use crate::walker::FieldValue;

/// Unix timestamps between 2001 and 2033, in seconds or milliseconds
const TIMESTAMP_SECONDS: std::ops::RangeInclusive<f64> = 1.0e9..=2.0e9;
const TIMESTAMP_MILLIS: std::ops::RangeInclusive<f64> = 1.0e12..=2.0e12;

const ROUND_BONUS: f64 = 0.05;
const ZERO_PENALTY: f64 = -0.05;
const NEGATIVE_PENALTY: f64 = -0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeAssessment {
    /// How likely a value of this magnitude is editable game state, in [0, 1]
    pub plausibility: f64,
    /// Signed correction (round-number bonus, zero/negative penalty)
    pub adjustment: f64,
    /// Category this magnitude usually belongs to
    pub bias: Option<Category>,
}

impl RangeAssessment {
    const fn new(plausibility: f64, adjustment: f64, bias: Option<Category>) -> Self {
        Self {
            plausibility,
            adjustment,
            bias,
        }
    }
}

pub fn assess(value: &FieldValue) -> RangeAssessment {
    match value {
        FieldValue::Boolean(_) => RangeAssessment::new(0.4, 0.0, Some(Category::Settings)),
        FieldValue::Text(_) => RangeAssessment::new(0.1, 0.0, None),
        FieldValue::Integer(n) => assess_number(*n as f64, true),
        FieldValue::Float(f) => assess_number(*f, false),
    }
}

fn assess_number(value: f64, integral: bool) -> RangeAssessment {
    if !value.is_finite() || value < 0.0 {
        return RangeAssessment::new(0.0, NEGATIVE_PENALTY, None);
    }
    if value == 0.0 {
        return RangeAssessment::new(0.1, ZERO_PENALTY, None);
    }

    let (plausibility, bias) = if value < 1.0 {
        (0.4, Some(Category::Settings))
    } else if value <= 10.0 {
        (0.6, integral.then_some(Category::Progress))
    } else if value <= 100.0 {
        (0.55, None)
    } else if value <= 100_000.0 {
        (0.8, Some(Category::Currency))
    } else if value <= 10_000_000.0 {
        (0.6, Some(Category::Currency))
    } else if integral && (TIMESTAMP_SECONDS.contains(&value) || TIMESTAMP_MILLIS.contains(&value))
    {
        (0.5, Some(Category::Time))
    } else {
        (0.25, None)
    };

    let adjustment = if is_round(value, integral) {
        ROUND_BONUS
    } else {
        0.0
    };
    RangeAssessment::new(plausibility, adjustment, bias)
}

/// Integers of at least 10 ending in a zero
pub fn is_round(value: f64, integral: bool) -> bool {
    integral && value >= 10.0 && value % 10.0 == 0.0
}
