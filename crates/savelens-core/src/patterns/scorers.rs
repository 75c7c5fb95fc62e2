//! Population-level scorers over a numeric sequence.
//!
//! Every scorer returns a value in [0, 1] and expects the caller to have
//! checked the minimum sequence length.

/// Relative tolerance for "consistent" steps
const STEP_TOLERANCE: f64 = 0.1;
/// Relative tolerance for the sum relationship
const SUM_TOLERANCE: f64 = 0.05;
/// Relative tolerance for the product relationship
const PRODUCT_TOLERANCE: f64 = 0.01;

pub fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

/// Check if a number is a power of two
pub fn is_power_of_two(n: u64) -> bool {
    n > 0 && (n & (n - 1)) == 0
}

fn fraction(values: &[f64], predicate: impl Fn(f64) -> bool) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|v| predicate(**v)).count() as f64 / values.len() as f64
}

/// Share of `(i-2, i-1, i)` windows satisfying `predicate`
fn triple_fraction(values: &[f64], predicate: impl Fn(f64, f64, f64) -> bool) -> f64 {
    if values.len() < 3 {
        return 0.0;
    }
    let hits = values
        .windows(3)
        .filter(|w| predicate(w[0], w[1], w[2]))
        .count();
    hits as f64 / (values.len() - 2) as f64
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

fn median(values: &[f64]) -> Option<f64> {
    let sorted = sorted(values);
    sorted.get(sorted.len().checked_sub(1)? / 2).copied()
}

fn within(value: f64, target: f64, tolerance: f64) -> bool {
    (value - target).abs() <= tolerance * target.abs().max(1.0)
}

fn is_round(value: f64, step: f64) -> bool {
    is_integral(value) && value >= step && value % step == 0.0
}

pub fn currency_progression(values: &[f64]) -> f64 {
    let round = fraction(values, |v| {
        is_round(v, 10.0) || is_round(v, 100.0) || is_round(v, 1000.0)
    });
    let ascending = if values.len() < 2 {
        0.0
    } else {
        values.windows(2).filter(|w| w[1] >= w[0]).count() as f64 / (values.len() - 1) as f64
    };
    let in_range = fraction(values, |v| (1.0..=10_000_000.0).contains(&v));
    0.4 * round + 0.3 * ascending + 0.3 * in_range
}

pub fn level_sequence(values: &[f64]) -> f64 {
    let mut levels: Vec<f64> = values.iter().copied().filter(|v| is_integral(*v)).collect();
    levels.sort_by(f64::total_cmp);
    levels.dedup();
    if levels.len() < 3 {
        return 0.0;
    }

    let diffs: Vec<f64> = levels.windows(2).map(|w| w[1] - w[0]).collect();
    let base = if diffs.iter().all(|d| *d == 1.0) {
        0.9
    } else {
        0.7 * fraction(&diffs, |d| (1.0..=3.0).contains(&d))
    };
    let in_range = fraction(&levels, |v| (1.0..=1000.0).contains(&v));
    (base + 0.1 * in_range).min(1.0)
}

pub fn experience_curve(values: &[f64]) -> f64 {
    let positive: Vec<f64> = sorted(values).into_iter().filter(|v| *v > 0.0).collect();
    if positive.len() < 4 {
        return 0.0;
    }

    let ratios: Vec<f64> = positive.windows(2).map(|w| w[1] / w[0]).collect();
    let average = ratios.iter().sum::<f64>() / ratios.len() as f64;
    let shape = if average > 1.1 && average <= 3.0 {
        0.8
    } else if average <= 1.1 {
        // Closer to linear growth
        0.3
    } else {
        0.1
    };
    let in_range = fraction(&positive, |v| (1.0..=10_000_000.0).contains(&v));
    (shape + 0.2 * in_range).min(1.0)
}

pub fn percentage(values: &[f64]) -> f64 {
    fraction(values, |v| (0.0..=100.0).contains(&v))
}

pub fn round_numbers(values: &[f64]) -> f64 {
    fraction(values, |v| is_round(v, 10.0))
}

pub fn fibonacci_like(values: &[f64]) -> f64 {
    triple_fraction(values, |a, b, c| c > 0.0 && (c - (a + b)).abs() <= 1.0)
}

pub fn power_of_two(values: &[f64]) -> f64 {
    fraction(values, |v| {
        is_integral(v) && v > 1.0 && v <= u64::MAX as f64 && is_power_of_two(v as u64)
    })
}

/// Small round pools such as 100 health or 50 mana
pub fn health_mana(values: &[f64]) -> f64 {
    fraction(values, |v| is_round(v, 10.0) && v <= 9_999.0)
}

/// Large round totals
pub fn achievement_scores(values: &[f64]) -> f64 {
    fraction(values, |v| is_round(v, 100.0) && v >= 1_000.0)
}

pub fn inventory_quantities(values: &[f64]) -> f64 {
    fraction(values, |v| is_integral(v) && (1.0..=999.0).contains(&v))
}

pub fn sum_relationship(values: &[f64]) -> f64 {
    triple_fraction(values, |a, b, c| {
        c != 0.0 && (a != 0.0 || b != 0.0) && within(c, a + b, SUM_TOLERANCE)
    })
}

pub fn ratio_relationship(values: &[f64]) -> f64 {
    let ratios: Vec<f64> = values
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| w[1] / w[0])
        .collect();
    if ratios.len() < 2 {
        return 0.0;
    }
    let Some(step) = median(&ratios) else {
        return 0.0;
    };
    // A constant sequence has ratio one; that is not a relationship
    if (step - 1.0).abs() < 0.01 {
        return 0.0;
    }
    fraction(&ratios, |r| (r - step).abs() <= STEP_TOLERANCE * step.abs())
}

pub fn difference_relationship(values: &[f64]) -> f64 {
    if values.len() < 3 {
        return 0.0;
    }
    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let Some(step) = median(&diffs) else {
        return 0.0;
    };
    if step == 0.0 {
        return 0.0;
    }
    fraction(&diffs, |d| (d - step).abs() <= STEP_TOLERANCE * step.abs())
}

pub fn product_relationship(values: &[f64]) -> f64 {
    triple_fraction(values, |a, b, c| {
        a.abs() > 1.0 && b.abs() > 1.0 && within(c, a * b, PRODUCT_TOLERANCE)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_power_of_two() {
        assert!(is_power_of_two(1));
        assert!(is_power_of_two(256));
        assert!(!is_power_of_two(0));
        assert!(!is_power_of_two(12));
    }

    #[test]
    fn test_level_sequence() {
        assert_eq!(level_sequence(&[1.0, 2.0, 3.0, 4.0]), 1.0);
        let gaps = level_sequence(&[1.0, 3.0, 5.0, 20.0]);
        assert!(gaps > 0.4 && gaps < 0.7);
        assert_eq!(level_sequence(&[1.5, 2.5, 3.5]), 0.0);
    }

    #[test]
    fn test_currency_progression() {
        let score = currency_progression(&[100.0, 250.0, 1000.0, 5000.0]);
        assert!((score - 1.0).abs() < 1e-9);
        assert!(currency_progression(&[-3.0, -7.0, -11.0]) < 0.1);
    }

    #[test]
    fn test_experience_curve() {
        assert!(experience_curve(&[100.0, 200.0, 400.0, 800.0, 1600.0]) >= 0.9);
        assert!(experience_curve(&[100.0, 101.0, 102.0, 103.0]) < 0.6);
        assert_eq!(experience_curve(&[100.0, 200.0, 400.0]), 0.0);
    }

    #[test]
    fn test_fibonacci_and_sum() {
        let fib = [1.0, 2.0, 3.0, 5.0, 8.0, 13.0];
        assert_eq!(fibonacci_like(&fib), 1.0);
        assert_eq!(sum_relationship(&fib), 1.0);
        assert_eq!(fibonacci_like(&[1.0, 1.0, 10.0]), 0.0);
    }

    #[test]
    fn test_ratio_and_difference() {
        assert_eq!(ratio_relationship(&[3.0, 6.0, 12.0, 24.0]), 1.0);
        assert_eq!(ratio_relationship(&[5.0, 5.0, 5.0]), 0.0);
        assert_eq!(difference_relationship(&[10.0, 20.0, 30.0, 40.0]), 1.0);
        assert_eq!(difference_relationship(&[7.0, 7.0, 7.0]), 0.0);
    }

    #[test]
    fn test_product() {
        assert_eq!(product_relationship(&[2.0, 3.0, 6.0]), 1.0);
        assert_eq!(product_relationship(&[1.0, 1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_fractions() {
        assert_eq!(percentage(&[10.0, 50.0, 150.0, 90.0]), 0.75);
        assert_eq!(power_of_two(&[2.0, 4.0, 6.0, 8.0]), 0.75);
        assert_eq!(achievement_scores(&[1000.0, 2500.0, 10.0, 1250.0]), 0.5);
        assert_eq!(inventory_quantities(&[]), 0.0);
    }
}
