//! # Optimal Alignment
//!
//! Maximum-overlap pairing of the clusters of two partitions.
//!
//! The overlap matrix is turned into a cost matrix by subtracting every entry
//! from the largest one, and the resulting square assignment problem is
//! solved with the Hungarian algorithm (shortest augmenting paths with row and
//! column potentials), O(n³), in exact integer arithmetic.
//!
//! ## Tie-break
//! Several permutations can reach the same optimum. The identity permutation is
//! returned whenever it is optimal. Otherwise the result is the one the solver
//! produces when rows are inserted in ascending order and, among columns with
//! equal reduced cost, the lowest column index is taken. Both rules are
//! deterministic, so repeated runs give the same pairing.

/**
 * File: /src/alignment.rs
 * Created Date: Monday, March 9th 2026
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-09		    	Hungarian solver for cluster alignment
 */

use log::debug;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::types::OverlapError;

/// One-to-one pairing of overlap-matrix rows to columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    /// `assignment[row] = column`
    pub assignment: Vec<usize>,
    /// Sum of the overlap matrix over the paired cells
    pub score: usize,
}

impl Alignment {
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.assignment.iter().copied().enumerate()
    }

    pub fn is_identity(&self) -> bool {
        self.assignment.iter().enumerate().all(|(row, &col)| row == col)
    }

    /// Column paired with `row`
    pub fn column_for(&self, row: usize) -> Option<usize> {
        self.assignment.get(row).copied()
    }
}

/// Best pairing for a square overlap matrix.
///
/// Fails with [`OverlapError::InvalidShape`] when the matrix is not square.
pub fn solve_alignment(matrix: &Array2<usize>) -> Result<Alignment, OverlapError> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(OverlapError::InvalidShape(format!(
            "alignment needs a square matrix, got {}x{}",
            rows, cols
        )));
    }
    Ok(solve_alignment_view(matrix.view()))
}

/// Caller guarantees `matrix` is square.
pub(crate) fn solve_alignment_view(matrix: ArrayView2<'_, usize>) -> Alignment {
    let n = matrix.nrows();
    debug_assert_eq!(n, matrix.ncols());

    let max_value = matrix.iter().copied().max().unwrap_or(0);
    // maximize overlap == minimize what is left unmatched
    let cost = matrix.mapv(|v| (max_value - v) as i64);

    let assignment = hungarian(cost.view());
    let score = score_of(matrix, &assignment);

    let identity: Vec<usize> = (0..n).collect();
    let alignment = if score_of(matrix, &identity) == score {
        Alignment {
            assignment: identity,
            score,
        }
    } else {
        Alignment { assignment, score }
    };

    debug!(
        "Optimal alignment rows: {:?} cols: {:?} score: {}",
        (0..n).collect::<Vec<_>>(),
        alignment.assignment,
        alignment.score
    );
    alignment
}

fn score_of(matrix: ArrayView2<'_, usize>, assignment: &[usize]) -> usize {
    assignment
        .iter()
        .enumerate()
        .map(|(row, &col)| matrix[(row, col)])
        .sum()
}

/// Minimum-cost perfect assignment of a square cost matrix, `assignment[row] = column`.
///
/// Fails with [`OverlapError::InvalidShape`] when the matrix is not square.
pub fn minimize_assignment(cost: ArrayView2<'_, i64>) -> Result<Vec<usize>, OverlapError> {
    let (rows, cols) = cost.dim();
    if rows != cols {
        return Err(OverlapError::InvalidShape(format!(
            "assignment needs a square cost matrix, got {}x{}",
            rows, cols
        )));
    }
    Ok(hungarian(cost))
}

// Indices inside are 1-based, slot 0 is the virtual row/column the augmenting
// paths start from. `cost` must be square.
fn hungarian(cost: ArrayView2<'_, i64>) -> Vec<usize> {
    let n = cost.nrows();
    if n == 0 {
        return Vec::new();
    }

    let mut u = vec![0i64; n + 1];
    let mut v = vec![0i64; n + 1];
    // owner[j] = row currently holding column j, 0 when free
    let mut owner = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        owner[0] = row;
        let mut j0 = 0;
        let mut minv = vec![i64::MAX; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = owner[j0];
            let mut delta = i64::MAX;
            let mut j1 = 0;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let reduced = cost[(i0 - 1, j - 1)] - u[i0] - v[j];
                if reduced < minv[j] {
                    minv[j] = reduced;
                    way[j] = j0;
                }
                // strict: lowest column wins a tie
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=n {
                if used[j] {
                    u[owner[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if owner[j0] == 0 {
                break;
            }
        }

        // flip the augmenting path
        loop {
            let j1 = way[j0];
            owner[j0] = owner[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![0usize; n];
    for j in 1..=n {
        assignment[owner[j] - 1] = j - 1;
    }
    assignment
}
