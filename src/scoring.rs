/**
 * File: ./src/scoring.rs
 * Created Date: Wednesday, March 11th 2026
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-11		    	Comparison record and derived ratios
 */
// src/scoring.rs
use log::info;
use serde::{Deserialize, Serialize};

use crate::alignment::Alignment;
use crate::matching::count_total_matches;
use crate::matrix::OverlapMatrix;
use crate::types::{ClusterLabel, OverlapError, Partition};

/// Result of comparing two real partitions. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Overlap matrix rows, row = cluster of the first partition
    pub overlap: Vec<Vec<usize>>,
    pub alignment: Alignment,
    pub items_first: usize,
    pub items_second: usize,
    /// Equal pairs across all clusters, without first-match cut-off
    pub total_matches: usize,
}

/// Overlap matrix, optimal alignment and population sizes of `p1` against `p2`
pub fn compare_partitions<L1, L2, T>(
    p1: &Partition<L1, T>,
    p2: &Partition<L2, T>,
) -> Result<Comparison, OverlapError>
where
    L1: ClusterLabel,
    L2: ClusterLabel,
    T: PartialEq + Sync,
{
    let max_length = p1.num_clusters().max(p2.num_clusters());
    let overlap = OverlapMatrix::build_par(p1, p2, max_length)?;
    info!("Cluster overlap:\n{}", overlap);

    let alignment = overlap.optimal_alignment();
    info!(
        "Optimal alignment {:?} matches {} items",
        alignment.assignment, alignment.score
    );

    Ok(Comparison {
        overlap: overlap.rows(),
        alignment,
        items_first: p1.total_items(),
        items_second: p2.total_items(),
        total_matches: count_total_matches(p1, p2),
    })
}

pub fn score(comparison: &Comparison) -> usize {
    comparison.alignment.score
}

pub fn smaller_population(comparison: &Comparison) -> usize {
    comparison.items_first.min(comparison.items_second)
}

/// Aligned matches as a fraction of the smaller partition
pub fn fraction_of_smaller(comparison: &Comparison) -> Option<f64> {
    ratio(score(comparison), smaller_population(comparison))
}

/// Aligned matches as a fraction of the items both runs could share
pub fn fraction_of_common(comparison: &Comparison, common_items: usize) -> Option<f64> {
    ratio(score(comparison), common_items)
}

/// Share of all exact matches that the alignment keeps on paired clusters
pub fn fraction_aligned(comparison: &Comparison) -> Option<f64> {
    let matched: usize = comparison.overlap.iter().flatten().sum();
    ratio(score(comparison), matched)
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_cross_labels() {
        let p1: Partition<usize, char> = vec![(0, vec!['a', 'b']), (1, vec!['c'])].into_iter().collect();
        let p2: Partition<usize, char> = vec![(0, vec!['c']), (1, vec!['a', 'b'])].into_iter().collect();

        let comparison = compare_partitions(&p1, &p2).unwrap();
        assert_eq!(comparison.overlap, vec![vec![0, 2], vec![1, 0]]);
        assert_eq!(score(&comparison), 3);
        assert_eq!(comparison.total_matches, 3);
        assert_eq!(fraction_of_smaller(&comparison), Some(1.0));
        assert_eq!(fraction_aligned(&comparison), Some(1.0));
        assert_eq!(fraction_of_common(&comparison, 6), Some(0.5));
        assert_eq!(fraction_of_common(&comparison, 0), None);
    }

    #[test]
    fn test_partial_alignment_fraction() {
        // item 3 sits in clusters that cannot both be paired
        let p1: Partition<usize, u32> = vec![(0, vec![1, 2, 3]), (1, vec![4])].into_iter().collect();
        let p2: Partition<usize, u32> = vec![(0, vec![1, 2]), (1, vec![3, 4])].into_iter().collect();

        let comparison = compare_partitions(&p1, &p2).unwrap();
        assert_eq!(comparison.overlap, vec![vec![2, 1], vec![0, 1]]);
        assert_eq!(score(&comparison), 3);
        assert_eq!(fraction_aligned(&comparison), Some(0.75));
        assert_eq!(smaller_population(&comparison), 4);
    }
}
