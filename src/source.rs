//! # Partition Sources
//!
//! Where partitions come from. The comparison code only sees a
//! [`PartitionSource`]; the on-disk layout is an implementation detail of
//! [`NpyDirectorySource`].

/**
 * File: /src/source.rs
 * Created Date: Wednesday, March 11th 2026
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-11		    	Injected partition loading, .npy directory layout
 */

use std::error::Error;
use std::fmt;
use std::fs::{self, File};
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use log::{debug, info};
use ndarray::ArrayD;
use ndarray_npy::{ReadNpyError, ReadNpyExt, ReadableElement};

use crate::types::{ClusterLabel, Partition};

pub trait PartitionSource {
    type Label: ClusterLabel;
    type Item: PartialEq;

    fn load(&self) -> Result<Partition<Self::Label, Self::Item>, SourceError>;

    fn describe(&self) -> String;
}

/// A partition that is already in memory
pub struct MemorySource<L, T> {
    partition: Partition<L, T>,
}

impl<L, T> MemorySource<L, T> {
    pub fn new(partition: Partition<L, T>) -> Self {
        Self { partition }
    }
}

impl<L: ClusterLabel, T: PartialEq + Clone> PartitionSource for MemorySource<L, T> {
    type Label = L;
    type Item = T;

    fn load(&self) -> Result<Partition<L, T>, SourceError> {
        Ok(self.partition.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory partition of {} clusters", self.partition.num_clusters())
    }
}

/// One sub-directory per cluster, named by the cluster index, holding one
/// `.npy` array per item:
///
/// ```text
/// obs_to_min_states/
///   0/  0.npy 1.npy ...
///   1/  0.npy ...
/// ```
pub struct NpyDirectorySource<A = f32> {
    root: PathBuf,
    element: PhantomData<A>,
}

impl<A> NpyDirectorySource<A> {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            element: PhantomData,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl<A: ReadableElement + PartialEq> PartitionSource for NpyDirectorySource<A> {
    type Label = String;
    type Item = ArrayD<A>;

    fn load(&self) -> Result<Partition<String, ArrayD<A>>, SourceError> {
        let mut partition = Partition::new();

        for cluster_dir in sorted_entries(self.root())? {
            if !cluster_dir.is_dir() {
                debug!("Skipping {}, not a cluster directory", cluster_dir.display());
                continue;
            }
            let label = match cluster_dir.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            };

            let mut items = Vec::new();
            for item_path in sorted_entries(&cluster_dir)? {
                if item_path.extension().map_or(true, |ext| ext != "npy") {
                    debug!("Skipping {}, not an .npy file", item_path.display());
                    continue;
                }
                let reader = File::open(&item_path).map_err(|e| SourceError::io(&item_path, e))?;
                let item = ArrayD::<A>::read_npy(reader).map_err(|e| SourceError::Npy {
                    path: item_path.clone(),
                    source: e,
                })?;
                items.push(item);
            }
            partition.insert(label, items);
        }

        info!(
            "Loaded {} clusters, {} items from {}",
            partition.num_clusters(),
            partition.total_items(),
            self.root().display()
        );
        Ok(partition)
    }

    fn describe(&self) -> String {
        format!("npy directory {}", self.root().display())
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| SourceError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| SourceError::io(dir, e))?;
    entries.sort();
    Ok(entries)
}

/// Cluster sizes ordered by numeric label; labels that are not numbers go last
pub fn sorted_cluster_sizes<L: ClusterLabel, T>(partition: &Partition<L, T>) -> Vec<(L, usize)> {
    let mut sizes: Vec<(L, usize)> = partition
        .iter()
        .map(|(label, items)| (label.clone(), items.len()))
        .collect();
    sizes.sort_by_key(|(label, _)| label.to_index().unwrap_or(usize::MAX));
    sizes
}

pub fn log_cluster_sizes<L: ClusterLabel, T>(name: &str, partition: &Partition<L, T>) {
    for (label, size) in sorted_cluster_sizes(partition) {
        debug!("[{}] {:?} : {}", name, label, size);
    }
}

#[derive(Debug)]
pub enum SourceError {
    Io { path: PathBuf, source: io::Error },
    Npy { path: PathBuf, source: ReadNpyError },
}

impl SourceError {
    fn io(path: &Path, source: io::Error) -> Self {
        SourceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceError::Io { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            SourceError::Npy { path, source } => {
                write!(f, "Failed to decode {}: {}", path.display(), source)
            }
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SourceError::Io { source, .. } => Some(source),
            SourceError::Npy { source, .. } => Some(source),
        }
    }
}
