//! build_result.rs: assemble the result body from a solve outcome, hash its
//! canonical bytes into `RES:<sha256>`, and return the finished `ResultDoc`.

use km_algo::{analyze_pareto, EntropyProfile};
use km_core::variables::AdaptiveMode;
use km_core::{Params, PreferenceProfile};
use km_io::hasher;
use km_io::loader::LoadedDataset;

use crate::solve::SolveOutcome;
use crate::{
    CostRow, DatasetBlock, EngineMeta, EntropyBlock, EntropyPosition, OrderEntry, ParetoBlock,
    PipelineError, ResultBody, ResultDoc,
};

pub fn build_result(
    dataset: &LoadedDataset,
    params: &Params,
    engine: &EngineMeta,
    outcome: &SolveOutcome,
) -> Result<ResultDoc, PipelineError> {
    let profile = &dataset.profile;
    let kemeny = outcome.kemeny();

    let cost_matrix = kemeny.map(|k| {
        let cm = &k.cost_matrix;
        cm.alternatives()
            .iter()
            .zip(cm.matrix().rows())
            .map(|(alt, row)| CostRow { alternative: alt.name().to_string(), costs: row.to_vec() })
            .collect()
    });

    let entropy = match outcome {
        SolveOutcome::Adaptive(r) => Some(entropy_block(&r.entropy, r.mode)?),
        _ => None,
    };

    let body = ResultBody {
        engine: engine.clone(),
        method: params.method.as_str().to_string(),
        weighting: outcome.weight_label(),
        sort_order: outcome.ranking().order().as_str().to_string(),
        order: order_entries(outcome),
        total_cost: outcome.total_cost(),
        uniform_weights: kemeny.map(|k| k.cost_matrix.is_uniform()),
        position_weights: kemeny.map(|k| k.cost_matrix.position_weights().to_vec()),
        cost_matrix,
        entropy,
        pareto: pareto_block(profile)?,
        dataset: dataset_block(dataset),
    };

    let id = hasher::res_id_from_canonical(&body)?;
    Ok(ResultDoc { id: id.to_string(), body })
}

/// Consensus order, best first. Kemeny ranks come from the assignment;
/// rank-sum ranks are positions in the sorted order.
pub(crate) fn order_entries(outcome: &SolveOutcome) -> Vec<OrderEntry> {
    outcome
        .ranking()
        .sorted_entries()
        .into_iter()
        .enumerate()
        .map(|(i, (alt, score))| OrderEntry {
            alternative: alt.name().to_string(),
            rank: i as u32 + 1,
            score,
        })
        .collect()
}

pub(crate) fn entropy_block(
    entropy: &EntropyProfile,
    mode: AdaptiveMode,
) -> Result<EntropyBlock, PipelineError> {
    let mut positions = Vec::with_capacity(entropy.len());
    for k in 1..=entropy.len() as u32 {
        positions.push(EntropyPosition {
            position: k,
            entropy: entropy.entropy(k)?,
            normalized: entropy.normalized(k)?,
            level: entropy.consensus_level(k)?.as_str().to_string(),
        });
    }
    Ok(EntropyBlock {
        mode: mode.as_str().to_string(),
        positions,
        max_entropy: entropy.max_entropy(),
        theoretical_max: entropy.theoretical_max(),
        degenerate: entropy.is_degenerate(),
    })
}

pub(crate) fn pareto_block(profile: &PreferenceProfile) -> Result<ParetoBlock, PipelineError> {
    let report = analyze_pareto(profile)?;
    Ok(ParetoBlock {
        optimal: report.optimal.iter().map(|a| a.name().to_string()).collect(),
        dominating: report.dominating.map(|a| a.name().to_string()),
    })
}

pub(crate) fn dataset_block(dataset: &LoadedDataset) -> DatasetBlock {
    let profile = &dataset.profile;
    DatasetBlock {
        title: dataset.title.clone(),
        source: dataset.source.clone(),
        input_sha256: dataset.input_sha256.clone(),
        alternatives: profile.alternatives().iter().map(|a| a.name().to_string()).collect(),
        entries: profile.len(),
        total_voters: profile.total_voters(),
    }
}
