//! Per-position Shannon entropy of a preference profile.
//!
//! For each position `k`, tally (voter-weighted) which alternative occupies `k`
//! across all entries, then `H(k) = −Σ p·log2 p` over that distribution.
//! `H(k) = 0` iff every voter puts the same alternative at `k`; the ceiling is
//! `log2(m)`.
//!
//! The analyzer derives two weight vectors from the entropies:
//! - conflict focus:  φ(k) = H(k) / H_max
//! - consensus focus: φ(k) = 1 − H(k) / H_max
//!
//! When `H_max = 0` (all positions unanimous) both collapse to uniform weights.

use km_core::variables::AdaptiveMode;
use km_core::PreferenceProfile;
use tracing::debug;

use crate::error::KemenyError;
use crate::weighting::position::PositionWeight;

/// Qualitative reading of a position's normalized entropy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsensusLevel {
    HighConsensus,
    ModerateConsensus,
    SomeDisagreement,
    HighDisagreement,
}

impl ConsensusLevel {
    /// Thresholds on `H(k) / H_max`: 0.2, 0.5, 0.8.
    pub fn from_normalized(x: f64) -> Self {
        if x < 0.2 {
            ConsensusLevel::HighConsensus
        } else if x < 0.5 {
            ConsensusLevel::ModerateConsensus
        } else if x < 0.8 {
            ConsensusLevel::SomeDisagreement
        } else {
            ConsensusLevel::HighDisagreement
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConsensusLevel::HighConsensus => "high_consensus",
            ConsensusLevel::ModerateConsensus => "moderate_consensus",
            ConsensusLevel::SomeDisagreement => "some_disagreement",
            ConsensusLevel::HighDisagreement => "high_disagreement",
        }
    }
}

/// Entropy per position plus the observed maximum. Read-only once built.
#[derive(Clone, Debug, PartialEq)]
pub struct EntropyProfile {
    entropies: Vec<f64>,
    max_entropy: f64,
}

impl EntropyProfile {
    pub fn analyze(profile: &PreferenceProfile) -> Result<Self, KemenyError> {
        let m = profile.alternative_count();
        if m == 0 || profile.is_empty() {
            return Err(KemenyError::InvalidProfile("empty profile".into()));
        }
        let total = profile.total_voters();
        if total == 0 {
            return Err(KemenyError::InvalidProfile("zero total voters".into()));
        }

        // tally[k * m + i] = voters placing alternative i at position k+1
        let mut tally = vec![0u64; m * m];
        for (e, entry) in profile.entries().iter().enumerate() {
            let voters = entry.voters() as u64;
            for (i, &rank) in profile.rank_row(e).iter().enumerate() {
                tally[(rank as usize - 1) * m + i] += voters;
            }
        }

        let total = total as f64;
        let entropies: Vec<f64> = tally
            .chunks_exact(m)
            .map(|row| {
                row.iter()
                    .filter(|&&c| c > 0)
                    .map(|&c| {
                        let p = c as f64 / total;
                        -p * p.log2()
                    })
                    .sum::<f64>()
                    .max(0.0)
            })
            .collect();

        let max_entropy = entropies.iter().copied().fold(0.0f64, f64::max);
        debug!(m, max_entropy, "position entropy analyzed");
        Ok(Self { entropies, max_entropy })
    }

    /// Number of positions `m`.
    #[inline]
    pub fn len(&self) -> usize { self.entropies.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.entropies.is_empty() }

    /// `H(k)` for 1-based `k`.
    pub fn entropy(&self, k: u32) -> Result<f64, KemenyError> {
        self.check(k)?;
        Ok(self.entropies[(k - 1) as usize])
    }

    #[inline]
    pub fn entropies(&self) -> &[f64] { &self.entropies }

    /// Observed `max_k H(k)`.
    #[inline]
    pub fn max_entropy(&self) -> f64 { self.max_entropy }

    /// `log2(m)`, the largest entropy any position could reach.
    pub fn theoretical_max(&self) -> f64 {
        (self.entropies.len() as f64).log2()
    }

    /// Every position is unanimous.
    #[inline]
    pub fn is_degenerate(&self) -> bool { self.max_entropy <= 0.0 }

    /// `H(k) / H_max`, or 0 when `H_max = 0`.
    pub fn normalized(&self, k: u32) -> Result<f64, KemenyError> {
        let h = self.entropy(k)?;
        Ok(if self.is_degenerate() { 0.0 } else { h / self.max_entropy })
    }

    pub fn consensus_level(&self, k: u32) -> Result<ConsensusLevel, KemenyError> {
        self.normalized(k).map(ConsensusLevel::from_normalized)
    }

    /// Realized weight vector for `mode`; uniform when degenerate.
    pub fn weights(&self, mode: AdaptiveMode) -> Vec<f64> {
        if self.is_degenerate() {
            debug!("all positions unanimous, falling back to uniform weights");
            return vec![1.0; self.entropies.len()];
        }
        let hmax = self.max_entropy;
        self.entropies
            .iter()
            .map(|h| match mode {
                AdaptiveMode::ConflictFocus => h / hmax,
                AdaptiveMode::ConsensusFocus => 1.0 - h / hmax,
            })
            .collect()
    }

    /// Weight function for `mode`: an explicit table, or `Uniform` when degenerate.
    pub fn weight_function(&self, mode: AdaptiveMode) -> PositionWeight {
        if self.is_degenerate() {
            PositionWeight::Uniform
        } else {
            PositionWeight::Table(self.weights(mode))
        }
    }

    fn check(&self, k: u32) -> Result<(), KemenyError> {
        let len = self.entropies.len() as u32;
        if k == 0 || k > len {
            return Err(KemenyError::OutOfRange { position: k, len });
        }
        Ok(())
    }
}

/* ---------------------------------- Tests --------------------------------- */
