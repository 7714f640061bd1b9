//! Engine-level scenarios on concrete profiles.

use km_algo::{
    aggregate_rank_sum, analyze_pareto, solve_adaptive, solve_classic, solve_position_weighted,
    AdaptiveMode, PositionWeight,
};
use km_core::{Alternative, PreferenceProfile, Ranking, RankingEntry};

fn alt(s: &str) -> Alternative { s.parse().unwrap() }

fn entry(names: &[&str], voters: u32) -> RankingEntry {
    RankingEntry::new(Ranking::from_order(names.iter().map(|n| alt(n)).collect()).unwrap(), voters)
        .unwrap()
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
fn reference_dataset_classic_and_rank_sum() {
    let p = reference_profile();

    let classic = solve_classic(&p).unwrap();
    assert_eq!(classic.total_cost, 144.0);
    assert_eq!(classic.rank_of(&alt("A")), Some(1));
    assert_eq!(classic.rank_of(&alt("B")), Some(2));
    assert_eq!(classic.rank_of(&alt("C")), Some(3));

    let rank_sum = aggregate_rank_sum(&p).unwrap();
    assert_eq!(rank_sum.score_of(&alt("A")), Some(122.0));
    assert_eq!(rank_sum.score_of(&alt("B")), Some(111.0));
    assert_eq!(rank_sum.score_of(&alt("C")), Some(127.0));
    let order: Vec<&str> = rank_sum.ordered_alternatives().iter().map(|a| a.name()).collect();
    assert_eq!(order, vec!["B", "A", "C"]);

    let pareto = analyze_pareto(&p).unwrap();
    assert_eq!(pareto.optimal.len(), 3);
    assert!(pareto.dominating.is_none());
}

#[test]
fn unanimous_profile_adaptive_equals_classic() {
    let p = PreferenceProfile::new(vec![
        entry(&["D", "B", "A", "C"], 4),
        entry(&["D", "B", "A", "C"], 9),
    ])
    .unwrap();
    let classic = solve_classic(&p).unwrap();
    assert_eq!(classic.total_cost, 0.0);

    for mode in [AdaptiveMode::ConflictFocus, AdaptiveMode::ConsensusFocus] {
        let adaptive = solve_adaptive(&p, mode).unwrap();
        assert!(adaptive.entropy.entropies().iter().all(|&h| h == 0.0));
        assert_eq!(adaptive.weighted.position_weights(), &[1.0; 4]);
        assert_eq!(adaptive.weighted.base.total_cost, classic.total_cost);
        assert_eq!(adaptive.weighted.base.assignment, classic.assignment);
        assert_eq!(adaptive.weighted.base.ranking, classic.ranking);
    }
}

#[test]
fn top_k_cost_is_invariant_under_tail_permutation() {
    let p = PreferenceProfile::new(vec![
        entry(&["A", "B", "C", "D", "E"], 5),
        entry(&["C", "E", "A", "B", "D"], 3),
        entry(&["E", "D", "B", "A", "C"], 4),
        entry(&["B", "A", "D", "E", "C"], 2),
    ])
    .unwrap();
    let r = solve_position_weighted(&p, &PositionWeight::TopK { k: 2 }).unwrap();
    let cm = &r.base.cost_matrix;
    assert_eq!(r.position_weights(), &[1.0, 1.0, 0.0, 0.0, 0.0]);

    // Columns 3..m contribute nothing.
    for i in 0..cm.size() {
        for k in 2..cm.size() {
            assert_eq!(cm.value(i, k), 0.0);
        }
    }

    // Rotate the rows placed at positions 3..5 and re-price the assignment.
    let mut by_col = r.base.assignment.rows_by_column();
    by_col[2..].rotate_left(1);
    let permuted: f64 = by_col.iter().enumerate().map(|(k, &row)| cm.value(row, k)).sum();
    assert_eq!(permuted, r.base.total_cost);
}

#[test]
fn conflict_and_consensus_weights_are_complementary() {
    let p = reference_profile();
    let conflict = solve_adaptive(&p, AdaptiveMode::ConflictFocus).unwrap();
    let consensus = solve_adaptive(&p, AdaptiveMode::ConsensusFocus).unwrap();
    for (a, b) in conflict
        .weighted
        .position_weights()
        .iter()
        .zip(consensus.weighted.position_weights())
    {
        assert!((a + b - 1.0).abs() < 1e-12);
    }
    assert!(conflict.weighted.position_weights().iter().any(|&w| (w - 1.0).abs() < 1e-12));
}
