//! Alternative × position cost matrix.
//!
//! `d[i][k] = φ(k+1, m) · Σ_entries voters · |(k+1) − rank(alt_i)|`
//!
//! Rows follow the profile's canonical alternative order, columns are 0-based
//! positions. Storage is one flat row-major buffer.

use km_core::{Alternative, PreferenceProfile};
use tracing::{debug, warn};

use crate::error::KemenyError;
use crate::weighting::position::{is_uniform, PositionWeight};

/// Dense `n × n` matrix of finite reals, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct SquareMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SquareMatrix {
    /// Build from rows; every row must have length `rows.len()` and every cell must be finite.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, KemenyError> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(KemenyError::MalformedCostMatrix(format!(
                    "row {i} has {} columns, expected {n}",
                    row.len()
                )));
            }
            data.extend(row);
        }
        Self::from_flat(n, data)
    }

    pub fn from_flat(n: usize, data: Vec<f64>) -> Result<Self, KemenyError> {
        if data.len() != n * n {
            return Err(KemenyError::MalformedCostMatrix(format!(
                "{} cells for a {n}x{n} matrix",
                data.len()
            )));
        }
        if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
            return Err(KemenyError::MalformedCostMatrix(format!(
                "non-finite value at ({}, {})",
                pos / n.max(1),
                pos % n.max(1)
            )));
        }
        Ok(Self { n, data })
    }

    #[inline]
    pub fn size(&self) -> usize { self.n }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 { self.data[row * self.n + col] }

    #[inline]
    pub fn row(&self, row: usize) -> &[f64] { &self.data[row * self.n..(row + 1) * self.n] }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks_exact(0) panics; an empty matrix has no rows anyway.
        self.data.chunks_exact(self.n.max(1))
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }
}

/// Cost matrix plus the realized weight vector used to fill its columns.
#[derive(Clone, Debug, PartialEq)]
pub struct CostMatrix {
    alternatives: Vec<Alternative>,
    matrix: SquareMatrix,
    weights: Vec<f64>,
}

impl CostMatrix {
    /// Realize `weight` over `1..=m`, then fill the matrix.
    pub fn build(profile: &PreferenceProfile, weight: &PositionWeight) -> Result<Self, KemenyError> {
        let m = check_profile(profile)?;
        let weights = weight.realize(m as u32)?;
        Self::build_with_weights(profile, weights)
    }

    /// Fill the matrix from an already-realized weight vector (length `m`).
    pub fn build_with_weights(
        profile: &PreferenceProfile,
        weights: Vec<f64>,
    ) -> Result<Self, KemenyError> {
        let m = check_profile(profile)?;
        if weights.len() != m {
            // First position without a weight, or the first surplus one.
            let position = weights.len().min(m) as u32 + 1;
            return Err(KemenyError::OutOfRange { position, len: weights.len() as u32 });
        }
        if let Some((k, &w)) = weights.iter().enumerate().find(|(_, w)| !w.is_finite() || **w < 0.0) {
            return Err(KemenyError::InvalidWeightFunction { position: k as u32 + 1, value: w });
        }
        if weights.iter().all(|&w| w == 0.0) {
            warn!(m, "all position weights are zero; every ranking has cost 0");
        }

        // Unweighted displacement Σ voters·|k+1 − rank| in integers, then scaled per column.
        let mut displacement = vec![0u64; m * m];
        for (e, entry) in profile.entries().iter().enumerate() {
            let voters = entry.voters() as u64;
            for (i, &rank) in profile.rank_row(e).iter().enumerate() {
                let row = &mut displacement[i * m..(i + 1) * m];
                for (k, cell) in row.iter_mut().enumerate() {
                    *cell += voters * (k as u64 + 1).abs_diff(rank as u64);
                }
            }
        }

        let data = displacement
            .iter()
            .enumerate()
            .map(|(idx, &d)| d as f64 * weights[idx % m])
            .collect();
        let matrix = SquareMatrix::from_flat(m, data)?;

        debug!(m, entries = profile.len(), uniform = is_uniform(&weights), "cost matrix built");
        Ok(Self { alternatives: profile.alternatives().to_vec(), matrix, weights })
    }

    /// Cost of placing alternative `alt_idx` at 0-based position `pos_idx`.
    #[inline]
    pub fn value(&self, alt_idx: usize, pos_idx: usize) -> f64 { self.matrix.get(alt_idx, pos_idx) }

    #[inline]
    pub fn size(&self) -> usize { self.matrix.size() }

    /// The weight vector the columns were scaled by; `[k]` is φ(k+1, m).
    #[inline]
    pub fn position_weights(&self) -> &[f64] { &self.weights }

    #[inline]
    pub fn alternatives(&self) -> &[Alternative] { &self.alternatives }

    #[inline]
    pub fn matrix(&self) -> &SquareMatrix { &self.matrix }

    pub fn is_uniform(&self) -> bool { is_uniform(&self.weights) }
}

fn check_profile(profile: &PreferenceProfile) -> Result<usize, KemenyError> {
    let m = profile.alternative_count();
    if profile.is_empty() {
        return Err(KemenyError::InvalidProfile("profile has no entries".into()));
    }
    if m == 0 {
        return Err(KemenyError::InvalidProfile("profile has no alternatives".into()));
    }
    Ok(m)
}

/* ---------------------------------- Tests --------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use km_core::{Ranking, RankingEntry};

    fn entry(names: &[&str], voters: u32) -> RankingEntry {
        let order = names.iter().map(|n| n.parse::<Alternative>().unwrap()).collect();
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
    fn classic_matrix_matches_hand_computation() {
        let cm = CostMatrix::build(&reference_profile(), &PositionWeight::Uniform).unwrap();
        assert_eq!(
            cm.matrix().to_rows(),
            vec![
                vec![62.0, 48.0, 58.0],
                vec![51.0, 29.0, 69.0],
                vec![67.0, 43.0, 53.0],
            ]
        );
        assert!(cm.is_uniform());
    }

    #[test]
    fn columns_scale_by_realized_weights() {
        let p = reference_profile();
        let cm = CostMatrix::build(&p, &PositionWeight::Hyperbolic).unwrap();
        assert_eq!(cm.position_weights(), &[1.0, 0.5, 1.0 / 3.0]);
        assert_eq!(cm.value(0, 1), 24.0);
        assert!((cm.value(1, 2) - 23.0).abs() < 1e-9);
        assert!(!cm.is_uniform());
    }

    #[test]
    fn explicit_weights_are_validated() {
        let p = reference_profile();
        assert!(matches!(
            CostMatrix::build_with_weights(&p, vec![1.0, -0.5, 1.0]),
            Err(KemenyError::InvalidWeightFunction { position: 2, .. })
        ));
        assert_eq!(
            CostMatrix::build_with_weights(&p, vec![1.0, 1.0]).unwrap_err(),
            KemenyError::OutOfRange { position: 3, len: 2 }
        );
        assert_eq!(
            CostMatrix::build_with_weights(&p, vec![1.0; 5]).unwrap_err(),
            KemenyError::OutOfRange { position: 4, len: 5 }
        );
    }

    #[test]
    fn square_matrix_rejects_ragged_and_non_finite() {
        assert!(SquareMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
        assert!(SquareMatrix::from_rows(vec![vec![1.0, f64::INFINITY], vec![0.0, 0.0]]).is_err());
        let ok = SquareMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(ok.row(1), &[3.0, 4.0]);
        assert_eq!(ok.size(), 2);
    }
}
