//! Kemeny median solvers (classic, position-weighted, entropy-adaptive).
//!
//! All three reduce to: cost matrix → assignment → ranking where
//! rank = assigned column + 1 (ascending, 1 = best) and total cost is the sum
//! of the assigned cells. Nothing is shared between calls.

use km_core::variables::AdaptiveMode;
use km_core::{AggregatedRanking, Alternative, PreferenceProfile, SortOrder};
use tracing::debug;

use crate::error::KemenyError;
use crate::kemeny::assignment::{solve_assignment, Assignment};
use crate::kemeny::cost_matrix::CostMatrix;
use crate::weighting::entropy::EntropyProfile;
use crate::weighting::position::PositionWeight;

/// Consensus ranking plus the matrix and assignment that produced it.
#[derive(Clone, Debug)]
pub struct KemenyResult {
    /// Alternative → rank (as f64), ascending.
    pub ranking: AggregatedRanking,
    pub total_cost: f64,
    pub cost_matrix: CostMatrix,
    pub assignment: Assignment,
}

impl KemenyResult {
    /// Alternatives best-first.
    pub fn order(&self) -> Vec<&Alternative> {
        let alts = self.cost_matrix.alternatives();
        self.assignment.rows_by_column().into_iter().map(|row| &alts[row]).collect()
    }

    /// 1-based consensus rank of `alt`.
    pub fn rank_of(&self, alt: &Alternative) -> Option<u32> {
        let row = self.cost_matrix.alternatives().iter().position(|a| a == alt)?;
        Some(self.assignment.column_of(row) as u32 + 1)
    }
}

/// Position-weighted result; the realized weights live on `base.cost_matrix`.
#[derive(Clone, Debug)]
pub struct WeightedKemenyResult {
    pub base: KemenyResult,
    pub weight_label: String,
}

impl WeightedKemenyResult {
    #[inline]
    pub fn position_weights(&self) -> &[f64] { self.base.cost_matrix.position_weights() }

    /// Realized weights are all 1 (classic Kemeny).
    pub fn is_classic(&self) -> bool { self.base.cost_matrix.is_uniform() }
}

/// Entropy-adaptive result with the entropy profile that derived the weights.
#[derive(Clone, Debug)]
pub struct AdaptiveKemenyResult {
    pub weighted: WeightedKemenyResult,
    pub entropy: EntropyProfile,
    pub mode: AdaptiveMode,
}

/// Unweighted Kemeny median (φ ≡ 1).
pub fn solve_classic(profile: &PreferenceProfile) -> Result<KemenyResult, KemenyError> {
    let cm = CostMatrix::build(profile, &PositionWeight::Uniform)?;
    solve_matrix(cm)
}

/// Kemeny median under a caller-supplied position weight function.
pub fn solve_position_weighted(
    profile: &PreferenceProfile,
    weight: &PositionWeight,
) -> Result<WeightedKemenyResult, KemenyError> {
    let cm = CostMatrix::build(profile, weight)?;
    let base = solve_matrix(cm)?;
    Ok(WeightedKemenyResult { base, weight_label: weight.label() })
}

/// Analyze position entropy, derive weights for `mode`, then solve weighted.
pub fn solve_adaptive(
    profile: &PreferenceProfile,
    mode: AdaptiveMode,
) -> Result<AdaptiveKemenyResult, KemenyError> {
    let entropy = EntropyProfile::analyze(profile)?;
    let weight = entropy.weight_function(mode);
    let weighted = solve_position_weighted(profile, &weight)?;
    Ok(AdaptiveKemenyResult { weighted, entropy, mode })
}

fn solve_matrix(cost_matrix: CostMatrix) -> Result<KemenyResult, KemenyError> {
    let assignment = solve_assignment(cost_matrix.matrix())?;
    let scores = cost_matrix
        .alternatives()
        .iter()
        .cloned()
        .zip(assignment.columns().iter().map(|&c| (c + 1) as f64))
        .collect();
    let ranking = AggregatedRanking::new(scores, SortOrder::Ascending)?;
    let total_cost = assignment.total_cost();
    debug!(m = cost_matrix.size(), total_cost, "kemeny median solved");
    Ok(KemenyResult { ranking, total_cost, cost_matrix, assignment })
}

/* ---------------------------------- Tests --------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use km_core::{Ranking, RankingEntry};

    fn alt(s: &str) -> Alternative { s.parse().unwrap() }

    fn entry(names: &[&str], voters: u32) -> RankingEntry {
        let order = names.iter().map(|n| alt(n)).collect();
        RankingEntry::new(Ranking::from_order(order).unwrap(), voters).unwrap()
    }

    fn reference_profile() -> PreferenceProfile {
        PreferenceProfile::new(vec![
            entry(&["A", "B", "C"], 23),
            entry(&["B", "C", "A"], 17),
            entry(&["B", "A", "C"], 2),
            entry(&["C", "A", "B"], 10),
            entry(&["C", "B", "A"], 8),
        ])
        .unwrap()
    }

    #[test]
    fn classic_reference_median() {
        let r = solve_classic(&reference_profile()).unwrap();
        assert_eq!(r.total_cost, 144.0);
        let names: Vec<&str> = r.order().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(r.rank_of(&alt("c")), Some(3));
        assert_eq!(r.ranking.order(), SortOrder::Ascending);
        assert_eq!(r.ranking.score_of(&alt("B")), Some(2.0));
    }

    #[test]
    fn uniform_weighting_equals_classic() {
        let p = reference_profile();
        let w = solve_position_weighted(&p, &PositionWeight::Uniform).unwrap();
        let c = solve_classic(&p).unwrap();
        assert_eq!(w.base.total_cost, c.total_cost);
        assert_eq!(w.base.assignment, c.assignment);
        assert!(w.is_classic());
        assert_eq!(w.weight_label, "uniform");
    }

    #[test]
    fn weighted_total_is_sum_of_assigned_cells() {
        let p = reference_profile();
        let w = solve_position_weighted(&p, &PositionWeight::Linear).unwrap();
        let cm = &w.base.cost_matrix;
        let sum: f64 = w
            .base
            .assignment
            .columns()
            .iter()
            .enumerate()
            .map(|(i, &k)| cm.value(i, k))
            .sum();
        assert!((sum - w.base.total_cost).abs() < 1e-9);
        assert_eq!(w.position_weights().len(), 3);
    }

    #[test]
    fn adaptive_exposes_entropy_and_mode() {
        let p = reference_profile();
        let r = solve_adaptive(&p, AdaptiveMode::ConsensusFocus).unwrap();
        assert_eq!(r.mode, AdaptiveMode::ConsensusFocus);
        assert_eq!(r.entropy.len(), 3);
        assert!(r.entropy.max_entropy() > 0.0);
        assert_eq!(r.weighted.weight_label, "entropy_table");
        assert_eq!(r.weighted.position_weights(), r.entropy.weights(AdaptiveMode::ConsensusFocus));
    }

    #[test]
    fn failing_weight_function_aborts_solve() {
        let p = reference_profile();
        let bad = PositionWeight::custom("neg", |_, _| -1.0);
        assert!(matches!(
            solve_position_weighted(&p, &bad),
            Err(KemenyError::InvalidWeightFunction { position: 1, .. })
        ));
    }

    #[test]
    fn overflowing_weighted_total_is_rejected() {
        // Every cell stays finite; only their sum overflows.
        let p = reference_profile();
        let huge = PositionWeight::custom("huge", |_, _| 1.5e306);
        assert!(matches!(
            solve_position_weighted(&p, &huge),
            Err(KemenyError::MalformedCostMatrix(_))
        ));
    }
}
