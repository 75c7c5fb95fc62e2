//! Deduplication and ranking of candidates from all passes.

use std::collections::HashSet;

use crate::model::Candidate;

/// Drop exact `(key, raw value, location)` repeats keeping the first, sort by
/// confidence (stable, so earlier passes win ties) and keep the top `limit`.
pub fn rank(candidates: Vec<Candidate>, limit: usize) -> Vec<Candidate> {
    let keep: Vec<bool> = {
        let mut seen = HashSet::new();
        candidates.iter().map(|c| seen.insert(c.identity())).collect()
    };
    let mut unique: Vec<Candidate> = candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(candidate, keep)| keep.then_some(candidate))
        .collect();

    unique.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    unique.truncate(limit);
    unique
}
