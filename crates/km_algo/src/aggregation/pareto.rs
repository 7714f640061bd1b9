//! Pareto dominance over a preference profile.
//!
//! `a` dominates `b` iff `a` is ranked no worse than `b` in every entry and
//! strictly better in at least one.

use km_core::{Alternative, PreferenceProfile};

use crate::error::KemenyError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParetoReport {
    /// Alternatives dominated by no other, in the profile's canonical order.
    pub optimal: Vec<Alternative>,
    /// An alternative that dominates every other one, if it exists.
    pub dominating: Option<Alternative>,
    /// All dominance pairs `(winner, loser)` in canonical row-major order.
    pub dominance: Vec<(Alternative, Alternative)>,
}

fn dominates(profile: &PreferenceProfile, a: usize, b: usize) -> bool {
    let mut strictly = false;
    for e in 0..profile.len() {
        let (ra, rb) = (profile.rank(e, a), profile.rank(e, b));
        if ra > rb {
            return false;
        }
        strictly |= ra < rb;
    }
    strictly
}

pub fn analyze_pareto(profile: &PreferenceProfile) -> Result<ParetoReport, KemenyError> {
    let m = profile.alternative_count();
    if m == 0 || profile.is_empty() {
        return Err(KemenyError::InvalidProfile("empty profile".into()));
    }
    let alts = profile.alternatives();

    let mut dominated = vec![false; m];
    let mut wins = vec![0usize; m];
    let mut dominance = Vec::new();
    for a in 0..m {
        for b in 0..m {
            if a != b && dominates(profile, a, b) {
                dominated[b] = true;
                wins[a] += 1;
                dominance.push((alts[a].clone(), alts[b].clone()));
            }
        }
    }

    let optimal = (0..m).filter(|&i| !dominated[i]).map(|i| alts[i].clone()).collect();
    let dominating = (0..m).find(|&i| m > 1 && wins[i] == m - 1).map(|i| alts[i].clone());
    Ok(ParetoReport { optimal, dominating, dominance })
}
