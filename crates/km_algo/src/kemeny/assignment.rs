//! Linear assignment: Hungarian method with row/column potentials.
//!
//! Classic O(n³) primal-dual formulation (1-based internal arrays):
//! - `u[i]`, `v[j]`: potentials; reduced cost is `a[i][j] − u[i] − v[j]`.
//! - `p[j]`: row currently matched to column `j` (0 = free); `p[0]` is the row
//!   being inserted.
//! - `way[j]`: previous column on the alternating path to `j`.
//!
//! Each row is added in turn: grow the alternating tree over unused columns by
//! the smallest slack, shift potentials by that slack, and stop at the first
//! free column; then augment back along `way`.
//!
//! Determinism:
//! - Rows are inserted in index order and columns scanned `1..=n`; strict `<`
//!   keeps the first column among equal slacks. Among several optimal
//!   assignments the one this order reaches is returned.

use tracing::debug;

use crate::error::KemenyError;
use crate::kemeny::cost_matrix::SquareMatrix;

/// Row → column permutation with its total cost.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    columns: Vec<usize>,
    total_cost: f64,
}

impl Assignment {
    /// `columns()[row]` is the 0-based column assigned to `row`.
    #[inline]
    pub fn columns(&self) -> &[usize] { &self.columns }

    #[inline]
    pub fn column_of(&self, row: usize) -> usize { self.columns[row] }

    /// Σ cost[row][columns[row]].
    #[inline]
    pub fn total_cost(&self) -> f64 { self.total_cost }

    #[inline]
    pub fn len(&self) -> usize { self.columns.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.columns.is_empty() }

    /// Each column in `0..n` is used exactly once.
    pub fn is_bijection(&self) -> bool {
        let n = self.columns.len();
        let mut seen = vec![false; n];
        for &c in &self.columns {
            if c >= n || seen[c] {
                return false;
            }
            seen[c] = true;
        }
        true
    }

    /// Inverse permutation: `[col]` is the row placed in that column.
    pub fn rows_by_column(&self) -> Vec<usize> {
        let mut inv = vec![0usize; self.columns.len()];
        for (row, &col) in self.columns.iter().enumerate() {
            inv[col] = row;
        }
        inv
    }
}

/// Minimum-cost perfect matching of rows to columns.
pub fn solve_assignment(cost: &SquareMatrix) -> Result<Assignment, KemenyError> {
    let n = cost.size();
    if n == 0 {
        return Err(KemenyError::MalformedCostMatrix("empty matrix".into()));
    }

    let inf = f64::INFINITY;
    let mut u = vec![0.0f64; n + 1];
    let mut v = vec![0.0f64; n + 1];
    let mut p = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];
    let mut minv = vec![inf; n + 1];
    let mut used = vec![false; n + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0usize;
        minv.fill(inf);
        used.fill(false);

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = inf;
            let mut j1 = 0usize;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let cur = cost.get(i0 - 1, j - 1) - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            // No reachable column: slacks went non-finite.
            if j1 == 0 || !delta.is_finite() {
                return Err(KemenyError::MalformedCostMatrix(format!(
                    "reduced costs diverged while inserting row {}",
                    i - 1
                )));
            }

            for j in 0..=n {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        // Augment along the alternating path.
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut columns = vec![0usize; n];
    for j in 1..=n {
        columns[p[j] - 1] = j - 1;
    }
    let total_cost: f64 = columns.iter().enumerate().map(|(row, &col)| cost.get(row, col)).sum();
    if !total_cost.is_finite() {
        return Err(KemenyError::MalformedCostMatrix(format!(
            "total cost of the optimal assignment is not finite ({total_cost})"
        )));
    }

    debug!(n, total_cost, "assignment solved");
    Ok(Assignment { columns, total_cost })
}

/* ---------------------------------- Tests --------------------------------- */
