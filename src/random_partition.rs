/**
 * File: /src/random_partition.rs
 * Created Date: Tuesday, March 10th 2026
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-10		    	Random partitions with prescribed cluster sizes
 */

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{ClusterSizes, OverlapError, Partition};

/// Deal a uniform random permutation of `0..total` into clusters of the given sizes.
///
/// Clusters are filled in ascending index order. Every value in `0..total`
/// appears exactly once.
pub fn random_partition<R: Rng + ?Sized>(sizes: &ClusterSizes, rng: &mut R) -> Partition<usize, usize> {
    let total: usize = sizes.values().sum();
    let mut permuted: Vec<usize> = (0..total).collect();
    permuted.shuffle(rng);
    deal(sizes, permuted)
}

/// Random partition where only values below `common` can collide with another one.
///
/// Values `>= common` are shifted up by `offset`. With `offset` set to the item
/// count of a second partition drawn from `0..offset`, the two partitions can
/// share at most `common` items.
pub fn random_partition_with_common<R: Rng + ?Sized>(
    sizes: &ClusterSizes,
    common: usize,
    offset: usize,
    rng: &mut R,
) -> Result<Partition<usize, usize>, OverlapError> {
    let total: usize = sizes.values().sum();
    if common > total {
        return Err(OverlapError::InvalidParameter(format!(
            "{} common items requested from a population of {}",
            common, total
        )));
    }

    let mut permuted: Vec<usize> = (0..total)
        .map(|value| if value < common { value } else { value + offset })
        .collect();
    permuted.shuffle(rng);
    Ok(deal(sizes, permuted))
}

fn deal(sizes: &ClusterSizes, values: Vec<usize>) -> Partition<usize, usize> {
    let mut values = values.into_iter();
    sizes
        .iter()
        .map(|(&cluster, &size)| (cluster, values.by_ref().take(size).collect::<Vec<_>>()))
        .collect()
}
