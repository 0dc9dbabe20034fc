//! # Partition Data Structures
//!
//! Core data structures shared by the overlap matrix builder, the alignment
//! solver and the baseline simulator.

/**
 * File: /src/types.rs
 * Created Date: Monday, March 9th 2026
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-09		    	Partition, cluster labels and error types
 */

use std::collections::btree_map;
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::fmt;

/// Cluster index → number of items in that cluster
pub type ClusterSizes = BTreeMap<usize, usize>;

/// A cluster label that can be used as a row/column index of the overlap matrix.
///
/// Directory names such as `"0"`, `"11"` coerce to their integer value;
/// anything else is a [`OverlapError::LabelFormat`].
pub trait ClusterLabel: Ord + Clone + fmt::Debug {
    fn to_index(&self) -> Result<usize, OverlapError>;
}

macro_rules! unsigned_label {
    ($($t:ty),*) => {
        $(
            impl ClusterLabel for $t {
                fn to_index(&self) -> Result<usize, OverlapError> {
                    usize::try_from(*self)
                        .map_err(|_| OverlapError::LabelFormat(format!("{} does not fit in usize", self)))
                }
            }
        )*
    };
}

macro_rules! signed_label {
    ($($t:ty),*) => {
        $(
            impl ClusterLabel for $t {
                fn to_index(&self) -> Result<usize, OverlapError> {
                    usize::try_from(*self)
                        .map_err(|_| OverlapError::LabelFormat(format!("negative label {}", self)))
                }
            }
        )*
    };
}

unsigned_label!(usize, u8, u16, u32, u64);
signed_label!(i32, i64);

impl ClusterLabel for String {
    fn to_index(&self) -> Result<usize, OverlapError> {
        self.as_str().to_index()
    }
}

impl ClusterLabel for &str {
    fn to_index(&self) -> Result<usize, OverlapError> {
        self.trim()
            .parse::<usize>()
            .map_err(|_| OverlapError::LabelFormat(format!("'{}' is not a cluster index", self)))
    }
}

/// Assignment of items to labeled clusters
///
/// Labels are unique by construction. Item order inside a cluster carries no
/// meaning for any comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<L, T> {
    clusters: BTreeMap<L, Vec<T>>,
}

impl<L: Ord, T> Partition<L, T> {
    pub fn new() -> Self {
        Self {
            clusters: BTreeMap::new(),
        }
    }

    /// Insert a whole cluster, returning the items previously stored under `label`
    pub fn insert(&mut self, label: L, items: Vec<T>) -> Option<Vec<T>> {
        self.clusters.insert(label, items)
    }

    /// Append one item to a cluster, creating the cluster if needed
    pub fn push(&mut self, label: L, item: T) {
        self.clusters.entry(label).or_default().push(item);
    }

    /// Invert an item → label mapping into label → items.
    ///
    /// Items keep the order in which they were seen.
    pub fn group_by_label<I>(assignments: I) -> Self
    where
        I: IntoIterator<Item = (T, L)>,
    {
        let mut partition = Self::new();
        for (item, label) in assignments {
            partition.push(label, item);
        }
        partition
    }

    pub fn get(&self, label: &L) -> Option<&[T]> {
        self.clusters.get(label).map(|items| items.as_slice())
    }

    pub fn iter(&self) -> btree_map::Iter<'_, L, Vec<T>> {
        self.clusters.iter()
    }

    pub fn labels(&self) -> impl Iterator<Item = &L> {
        self.clusters.keys()
    }

    /// All items of all clusters, cluster by cluster
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.clusters.values().flat_map(|items| items.iter())
    }

    pub fn num_clusters(&self) -> usize {
        self.clusters.len()
    }

    pub fn total_items(&self) -> usize {
        self.clusters.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

impl<L: ClusterLabel, T> Partition<L, T> {
    /// Resolve every label to its matrix index.
    ///
    /// Fails on labels that are not integers and on two labels mapping to the
    /// same index (`"1"` and `"01"`).
    pub fn indexed_clusters(&self) -> Result<Vec<(usize, &[T])>, OverlapError> {
        let mut seen = HashSet::with_capacity(self.clusters.len());
        let mut indexed = Vec::with_capacity(self.clusters.len());
        for (label, items) in &self.clusters {
            let index = label.to_index()?;
            if !seen.insert(index) {
                return Err(OverlapError::LabelFormat(format!(
                    "label {:?} collides with another label at index {}",
                    label, index
                )));
            }
            indexed.push((index, items.as_slice()));
        }
        Ok(indexed)
    }

    /// Cluster sizes keyed by matrix index, ready for the random generator
    pub fn cluster_sizes(&self) -> Result<ClusterSizes, OverlapError> {
        Ok(self
            .indexed_clusters()?
            .into_iter()
            .map(|(index, items)| (index, items.len()))
            .collect())
    }
}

impl<L: Ord, T> Default for Partition<L, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Ord, T> FromIterator<(L, Vec<T>)> for Partition<L, T> {
    fn from_iter<I: IntoIterator<Item = (L, Vec<T>)>>(iter: I) -> Self {
        Self {
            clusters: iter.into_iter().collect(),
        }
    }
}

impl<L: Ord, T> From<BTreeMap<L, Vec<T>>> for Partition<L, T> {
    fn from(clusters: BTreeMap<L, Vec<T>>) -> Self {
        Self { clusters }
    }
}

impl<'a, L, T> IntoIterator for &'a Partition<L, T> {
    type Item = (&'a L, &'a Vec<T>);
    type IntoIter = btree_map::Iter<'a, L, Vec<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised by the overlap, alignment and simulation components
#[derive(Debug, Clone, PartialEq)]
pub enum OverlapError {
    /// Matrix not square, or its dimension does not cover the partitions
    InvalidShape(String),
    /// A cluster-size map sums to zero items
    EmptyPartition,
    /// A label cannot be turned into a distinct integer index
    LabelFormat(String),
    InvalidParameter(String),
}

impl fmt::Display for OverlapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OverlapError::InvalidShape(msg) => write!(f, "Invalid shape: {}", msg),
            OverlapError::EmptyPartition => {
                write!(f, "Empty partition: cluster sizes sum to zero items")
            }
            OverlapError::LabelFormat(msg) => write!(f, "Invalid cluster label: {}", msg),
            OverlapError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
        }
    }
}

impl Error for OverlapError {}
