//! Rank-sum aggregation (lower total is better).
//!
//! score(alt) = Σ_entries voters · rank(alt). Single pass over the profile's
//! rank table; integer accumulation, reported as f64.

use km_core::{AggregatedRanking, PreferenceProfile, SortOrder};

use crate::error::KemenyError;

pub fn aggregate_rank_sum(profile: &PreferenceProfile) -> Result<AggregatedRanking, KemenyError> {
    let m = profile.alternative_count();
    if m == 0 || profile.is_empty() {
        return Err(KemenyError::InvalidProfile("empty profile".into()));
    }

    let mut sums = vec![0u64; m];
    for (e, entry) in profile.entries().iter().enumerate() {
        let voters = entry.voters() as u64;
        for (sum, &rank) in sums.iter_mut().zip(profile.rank_row(e)) {
            *sum += voters * rank as u64;
        }
    }

    let scores = profile
        .alternatives()
        .iter()
        .cloned()
        .zip(sums.into_iter().map(|s| s as f64))
        .collect();
    Ok(AggregatedRanking::new(scores, SortOrder::Ascending)?)
}
