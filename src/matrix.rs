/*
 * File: /matrix.rs
 * Created Date: Monday, March 9th 2026
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-09		    	Square cluster-by-cluster overlap matrix
 */

use std::ops::Index;

use log::debug;
use ndarray::{Array2, ArrayView2, Axis};
use rayon::prelude::*;

use crate::alignment::{solve_alignment_view, Alignment};
use crate::matching::count_exact_matches;
use crate::types::{ClusterLabel, OverlapError, Partition};

/// Exact-match counts between the clusters of two partitions.
///
/// Row `i` is cluster `i` of the first partition, column `j` is cluster `j` of
/// the second. Always square; rows/columns without a cluster stay zero.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapMatrix {
    data: Array2<usize>,
    dimension: usize,
}

impl OverlapMatrix {
    pub fn zeros(dimension: usize) -> OverlapMatrix {
        OverlapMatrix {
            data: Array2::zeros((dimension, dimension)),
            dimension,
        }
    }

    // constructor with Array2<usize>
    pub fn from_array(data: Array2<usize>) -> Result<OverlapMatrix, OverlapError> {
        let (rows, cols) = data.dim();
        if rows != cols {
            return Err(OverlapError::InvalidShape(format!(
                "overlap matrix must be square, got {}x{}",
                rows, cols
            )));
        }
        Ok(OverlapMatrix {
            data,
            dimension: rows,
        })
    }

    /// Build the overlap matrix of `p1` against `p2` with side `max_length`.
    ///
    /// Every label must coerce to a distinct index below `max_length`.
    ///
    /// Cost is O(clusters1 × clusters2 × size1 × size2) item comparisons,
    /// i.e. quadratic in the total number of items. This scan dominates every
    /// analysis and every baseline trial.
    pub fn build<L1, L2, T>(
        p1: &Partition<L1, T>,
        p2: &Partition<L2, T>,
        max_length: usize,
    ) -> Result<OverlapMatrix, OverlapError>
    where
        L1: ClusterLabel,
        L2: ClusterLabel,
        T: PartialEq,
    {
        let rows = indexed_within(p1, max_length)?;
        let cols = indexed_within(p2, max_length)?;

        let mut matrix = OverlapMatrix::zeros(max_length);
        for &(i, values1) in &rows {
            for &(j, values2) in &cols {
                matrix.data[(i, j)] = count_exact_matches(values1, values2);
            }
        }
        debug!(
            "Built {}x{} overlap matrix, {} matched items in total",
            max_length,
            max_length,
            matrix.total()
        );
        Ok(matrix)
    }

    /// Same as [`OverlapMatrix::build`], one rayon task per cluster of `p1`
    pub fn build_par<L1, L2, T>(
        p1: &Partition<L1, T>,
        p2: &Partition<L2, T>,
        max_length: usize,
    ) -> Result<OverlapMatrix, OverlapError>
    where
        L1: ClusterLabel,
        L2: ClusterLabel,
        T: PartialEq + Sync,
    {
        let rows = indexed_within(p1, max_length)?;
        let cols = indexed_within(p2, max_length)?;

        let counts: Vec<(usize, Vec<(usize, usize)>)> = rows
            .par_iter()
            .map(|&(i, values1)| {
                let row = cols
                    .iter()
                    .map(|&(j, values2)| (j, count_exact_matches(values1, values2)))
                    .collect();
                (i, row)
            })
            .collect();

        let mut matrix = OverlapMatrix::zeros(max_length);
        for (i, row) in counts {
            for (j, count) in row {
                matrix.data[(i, j)] = count;
            }
        }
        Ok(matrix)
    }

    /// Build with `max_length = max(p1.num_clusters(), p2.num_clusters())`
    pub fn between<L1, L2, T>(
        p1: &Partition<L1, T>,
        p2: &Partition<L2, T>,
    ) -> Result<OverlapMatrix, OverlapError>
    where
        L1: ClusterLabel,
        L2: ClusterLabel,
        T: PartialEq,
    {
        let max_length = p1.num_clusters().max(p2.num_clusters());
        OverlapMatrix::build(p1, p2, max_length)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn get(&self, row: usize, col: usize) -> Option<usize> {
        self.data.get((row, col)).copied()
    }

    pub fn data(&self) -> &Array2<usize> {
        &self.data
    }

    pub fn view(&self) -> ArrayView2<'_, usize> {
        self.data.view()
    }

    /// Largest single entry, 0 for an empty matrix
    pub fn max_value(&self) -> usize {
        self.data.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.data.sum()
    }

    /// Matched items per row cluster, summed over every column cluster
    pub fn row_totals(&self) -> Vec<usize> {
        self.data.sum_axis(Axis(1)).to_vec()
    }

    pub fn rows(&self) -> Vec<Vec<usize>> {
        self.data.outer_iter().map(|row| row.to_vec()).collect()
    }

    /// Cluster pairing that maximizes the number of matched items
    pub fn optimal_alignment(&self) -> Alignment {
        // square by construction
        solve_alignment_view(self.data.view())
    }
}

impl Index<(usize, usize)> for OverlapMatrix {
    type Output = usize;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.data[index]
    }
}

impl std::fmt::Display for OverlapMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.data.outer_iter() {
            let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(f, "[{}]", cells.join(", "))?;
        }
        Ok(())
    }
}

fn indexed_within<L: ClusterLabel, T>(
    partition: &Partition<L, T>,
    max_length: usize,
) -> Result<Vec<(usize, &[T])>, OverlapError> {
    if partition.num_clusters() > max_length {
        return Err(OverlapError::InvalidShape(format!(
            "{} clusters do not fit in a {}x{} overlap matrix",
            partition.num_clusters(),
            max_length,
            max_length
        )));
    }
    let indexed = partition.indexed_clusters()?;
    if let Some(&(index, _)) = indexed.iter().find(|(index, _)| *index >= max_length) {
        return Err(OverlapError::InvalidShape(format!(
            "cluster index {} is outside a {}x{} overlap matrix",
            index, max_length, max_length
        )));
    }
    Ok(indexed)
}
