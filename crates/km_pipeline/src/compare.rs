//! Multi-method comparison on one profile: classic, hyperbolic, adaptive
//! (both modes) and rank-sum, one summary row each.

use km_algo::{
    aggregate_rank_sum, solve_adaptive, solve_classic, solve_position_weighted, PositionWeight,
};
use km_core::variables::AdaptiveMode;
use km_core::Method;
use km_io::hasher;
use km_io::loader::LoadedDataset;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::build_result::dataset_block;
use crate::solve::SolveOutcome;
use crate::{DatasetBlock, EngineMeta, OrderEntry, PipelineError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub method: String,
    pub weighting: String,
    pub order: Vec<OrderEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonDoc {
    pub id: String, // "RES:<hex64>"
    pub engine: EngineMeta,
    pub rows: Vec<ComparisonRow>,
    pub dataset: DatasetBlock,
    /// True when every Kemeny variant produced the same order.
    pub kemeny_orders_agree: bool,
}

pub fn compare_methods(
    dataset: &LoadedDataset,
    engine: &EngineMeta,
) -> Result<ComparisonDoc, PipelineError> {
    let profile = &dataset.profile;
    info!(m = profile.alternative_count(), "pipeline: compare methods");

    let outcomes = [
        SolveOutcome::Classic(solve_classic(profile)?),
        SolveOutcome::Weighted(solve_position_weighted(profile, &PositionWeight::Hyperbolic)?),
        SolveOutcome::Adaptive(solve_adaptive(profile, AdaptiveMode::ConflictFocus)?),
        SolveOutcome::Adaptive(solve_adaptive(profile, AdaptiveMode::ConsensusFocus)?),
        SolveOutcome::RankSum(aggregate_rank_sum(profile)?),
    ];

    let rows: Vec<ComparisonRow> = outcomes.iter().map(row_for).collect();

    let kemeny_orders: Vec<Vec<&str>> = rows
        .iter()
        .filter(|r| r.total_cost.is_some())
        .map(|r| r.order.iter().map(|o| o.alternative.as_str()).collect())
        .collect();
    let kemeny_orders_agree = kemeny_orders.windows(2).all(|w| w[0] == w[1]);

    #[derive(Serialize)]
    struct ComparisonNoId<'a> {
        engine: &'a EngineMeta,
        rows: &'a [ComparisonRow],
        dataset: &'a DatasetBlock,
        kemeny_orders_agree: bool,
    }
    let dataset = dataset_block(dataset);
    let id = hasher::res_id_from_canonical(&ComparisonNoId {
        engine,
        rows: &rows,
        dataset: &dataset,
        kemeny_orders_agree,
    })?;

    Ok(ComparisonDoc { id: id.to_string(), engine: engine.clone(), rows, dataset, kemeny_orders_agree })
}

fn row_for(outcome: &SolveOutcome) -> ComparisonRow {
    let method = match outcome {
        SolveOutcome::Adaptive(r) => format!("{}({})", Method::Adaptive, r.mode),
        other => other.method().as_str().to_string(),
    };
    ComparisonRow {
        method,
        weighting: outcome.weight_label(),
        order: crate::build_result::order_entries(outcome),
        total_cost: outcome.total_cost(),
    }
}
