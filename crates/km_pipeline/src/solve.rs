//! SOLVE stage: dispatch on `Params.method` to the matching engine entry point.

use km_algo::{
    aggregate_rank_sum, solve_adaptive, solve_classic, solve_position_weighted,
    AdaptiveKemenyResult, KemenyResult, PositionWeight, WeightedKemenyResult,
};
use km_core::{AggregatedRanking, Method, Params, PreferenceProfile};
use tracing::debug;

use crate::PipelineError;

/// Engine output for one method.
#[derive(Debug, Clone)]
pub enum SolveOutcome {
    Classic(KemenyResult),
    Weighted(WeightedKemenyResult),
    Adaptive(AdaptiveKemenyResult),
    RankSum(AggregatedRanking),
}

impl SolveOutcome {
    pub fn method(&self) -> Method {
        match self {
            SolveOutcome::Classic(_) => Method::Classic,
            SolveOutcome::Weighted(_) => Method::PositionWeighted,
            SolveOutcome::Adaptive(_) => Method::Adaptive,
            SolveOutcome::RankSum(_) => Method::RankSum,
        }
    }

    /// Kemeny part of the outcome (absent for rank-sum).
    pub fn kemeny(&self) -> Option<&KemenyResult> {
        match self {
            SolveOutcome::Classic(r) => Some(r),
            SolveOutcome::Weighted(r) => Some(&r.base),
            SolveOutcome::Adaptive(r) => Some(&r.weighted.base),
            SolveOutcome::RankSum(_) => None,
        }
    }

    pub fn ranking(&self) -> &AggregatedRanking {
        match self {
            SolveOutcome::Classic(r) => &r.ranking,
            SolveOutcome::Weighted(r) => &r.base.ranking,
            SolveOutcome::Adaptive(r) => &r.weighted.base.ranking,
            SolveOutcome::RankSum(r) => r,
        }
    }

    pub fn total_cost(&self) -> Option<f64> {
        self.kemeny().map(|k| k.total_cost)
    }

    pub fn weight_label(&self) -> String {
        match self {
            SolveOutcome::Classic(_) => PositionWeight::Uniform.label(),
            SolveOutcome::Weighted(r) => r.weight_label.clone(),
            SolveOutcome::Adaptive(r) => r.weighted.weight_label.clone(),
            SolveOutcome::RankSum(_) => "rank_sum".to_string(),
        }
    }
}

pub fn solve(profile: &PreferenceProfile, params: &Params) -> Result<SolveOutcome, PipelineError> {
    let outcome = match params.method {
        Method::Classic => SolveOutcome::Classic(solve_classic(profile)?),
        Method::PositionWeighted => {
            let weight = PositionWeight::from_params(params);
            SolveOutcome::Weighted(solve_position_weighted(profile, &weight)?)
        }
        Method::Adaptive => SolveOutcome::Adaptive(solve_adaptive(profile, params.adaptive_mode)?),
        Method::RankSum => SolveOutcome::RankSum(aggregate_rank_sum(profile)?),
    };
    debug!(method = %outcome.method(), total_cost = ?outcome.total_cost(), "solve finished");
    Ok(outcome)
}
