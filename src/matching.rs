/**
 * File: /src/matching.rs
 * Created Date: Monday, March 9th 2026
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-09		    	Exact-match counting and duplicate diagnostics
 */

use log::{debug, warn};

use crate::types::Partition;

/// Two items match only if every element is equal. No tolerance.
#[inline]
pub fn items_match<T: PartialEq + ?Sized>(a: &T, b: &T) -> bool {
    a == b
}

/// Index of the first item in `candidates` equal to `item`
pub fn first_match<T: PartialEq>(item: &T, candidates: &[T]) -> Option<usize> {
    candidates.iter().position(|candidate| items_match(item, candidate))
}

/// `(index in a, index in b)` for every item of `a` that has an equal item in `b`.
///
/// Only the first equal item of `b` is reported for each item of `a`, so the
/// result is not an injective matching when `b` holds duplicates.
pub fn matched_pairs<T: PartialEq>(a: &[T], b: &[T]) -> Vec<(usize, usize)> {
    a.iter()
        .enumerate()
        .filter_map(|(i, item)| first_match(item, b).map(|j| (i, j)))
        .collect()
}

/// Number of items of `a` that have at least one equal item in `b`.
///
/// Each item of `a` is counted at most once (first match wins). With
/// duplicates on either side the count is not symmetric: `[x, x]` against `[x]`
/// is 2, `[x]` against `[x, x]` is 1.
pub fn count_exact_matches<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    a.iter().filter(|item| first_match(*item, b).is_some()).count()
}

/// Every equal `(a, b)` pair between any cluster of `p1` and any cluster of `p2`.
///
/// No early exit, so duplicates are counted once per pair. Upper bound for the
/// exact-match counts of the overlap matrix.
pub fn count_total_matches<L1, L2, T>(p1: &Partition<L1, T>, p2: &Partition<L2, T>) -> usize
where
    L1: Ord,
    L2: Ord,
    T: PartialEq,
{
    p1.items()
        .map(|a| p2.items().filter(|b| items_match(a, *b)).count())
        .sum()
}

/// Count duplicated items across a whole partition.
///
/// Every item is compared with every item of the partition, itself included.
/// The first equal item found is taken as the self match; each further equal
/// item adds one to the count, so a value occurring `k` times contributes
/// `k * (k - 1)`. Advisory only: a non-zero count is logged and returned,
/// never raised.
pub fn verify_no_repeats<L: Ord, T: PartialEq>(partition: &Partition<L, T>) -> usize {
    let values: Vec<&T> = partition.items().collect();
    let mut num_duplicates = 0;

    for value in &values {
        let mut seen_self = false;
        for other in &values {
            if items_match(*value, *other) {
                if seen_self {
                    num_duplicates += 1;
                } else {
                    seen_self = true;
                }
            }
        }
    }

    if num_duplicates != 0 {
        warn!(
            "There were {} duplicates in {} total items",
            num_duplicates,
            values.len()
        );
    } else {
        debug!("No duplicates found in {} items", values.len());
    }
    num_duplicates
}
