//! Tunable engine constants.
//!
//! Every weight and threshold used by detection and scoring lives here so it
//! can be adjusted from a JSON file without touching code. `Default` carries
//! the stock values.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Category;

/// Weights used when fusing independent signals into one confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionWeights {
    pub keyword: f64,
    pub range: f64,
    pub context: f64,
    /// Bonus for a key that occurs exactly once in the file
    pub unique_bonus: f64,
    /// Penalty for a key/value that occurs in more than `frequent_threshold` places
    pub frequent_penalty: f64,
    pub frequent_threshold: usize,
    /// Alignment bonuses for binary offsets
    pub align8_bonus: f64,
    pub align4_bonus: f64,
    pub misaligned_penalty: f64,
    /// Bonus for the byte order the endianness hint prefers
    pub byte_order_bonus: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            keyword: 0.5,
            range: 0.25,
            context: 0.15,
            unique_bonus: 0.05,
            frequent_penalty: 0.15,
            frequent_threshold: 10,
            align8_bonus: 0.1,
            align4_bonus: 0.05,
            misaligned_penalty: 0.05,
            byte_order_bonus: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weights: FusionWeights,
    /// Minimum share of printable characters for a charset to be accepted
    pub printable_ratio: f64,
    /// Inclusive plausibility range for decoded binary integers
    pub binary_int_min: i64,
    pub binary_int_max: i64,
    /// Inclusive plausibility range for decoded binary floats
    pub binary_float_min: f64,
    pub binary_float_max: f64,
    /// Floats with a magnitude below this are treated as padding noise
    pub binary_float_epsilon: f64,
    /// Upper bound on numeric candidates emitted by one binary scan
    pub binary_candidate_budget: usize,
    /// Minimum length of a printable ASCII run inside binary data
    pub min_embedded_run: usize,
    pub pattern_threshold: f64,
    pub relationship_threshold: f64,
    /// Maximum number of candidates returned by analysis
    pub max_candidates: usize,
    /// Structured documents nested deeper than this are not analyzed
    pub max_depth: usize,
    /// Per-category keyword weight overrides
    pub category_weights: BTreeMap<Category, f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: FusionWeights::default(),
            printable_ratio: 0.7,
            binary_int_min: 1,
            binary_int_max: 100_000_000,
            binary_float_min: 0.0,
            binary_float_max: 1_000_000.0,
            binary_float_epsilon: 1e-3,
            binary_candidate_budget: 20_000,
            min_embedded_run: 4,
            pattern_threshold: 0.6,
            relationship_threshold: 0.5,
            max_candidates: 200,
            max_depth: 64,
            category_weights: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.printable_ratio) {
            return Err(Error::Config(format!(
                "printable_ratio must be within [0, 1], got {}",
                self.printable_ratio
            )));
        }
        if self.binary_int_min > self.binary_int_max {
            return Err(Error::Config(
                "binary_int_min is greater than binary_int_max".to_string(),
            ));
        }
        if self.binary_float_min > self.binary_float_max {
            return Err(Error::Config(
                "binary_float_min is greater than binary_float_max".to_string(),
            ));
        }
        if self.max_candidates == 0 {
            return Err(Error::Config("max_candidates must be positive".to_string()));
        }
        for (category, weight) in &self.category_weights {
            if !(0.0..=1.0).contains(weight) {
                return Err(Error::Config(format!(
                    "weight for {} must be within [0, 1], got {}",
                    category, weight
                )));
            }
        }
        Ok(())
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig> {
    let content = fs::read_to_string(&path)?;
    let config: EngineConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &EngineConfig) -> Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
