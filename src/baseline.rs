//! # Baseline Simulation
//!
//! Null distribution of alignment scores under random cluster assignment.
//!
//! Each trial draws two random partitions with the real runs' cluster sizes,
//! where only `common_items` values can appear in both, and records the
//! optimal alignment score. A real alignment score is only meaningful when
//! compared against this distribution.

/**
 * File: /src/baseline.rs
 * Created Date: Tuesday, March 10th 2026
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-10		    	Monte-Carlo baseline for alignment scores
 */

use std::time::Instant;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::matrix::OverlapMatrix;
use crate::random_partition::{random_partition, random_partition_with_common};
use crate::types::{ClusterSizes, OverlapError};

/// Simulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineConfig {
    /// Number of random trials, always run to completion
    pub trials: usize,
    /// Items that may appear in both simulated populations
    pub common_items: usize,
    /// Trial `i` uses seed `seed + i`
    pub seed: u64,
    /// Run trials on the rayon pool
    pub parallel: bool,
    /// Bins of the histograms over normalized scores
    pub histogram_bins: usize,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            trials: 1000,
            common_items: 0,
            seed: 42,
            parallel: true,
            histogram_bins: 20,
        }
    }
}

/// Raw outcome of a baseline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineResult {
    /// Alignment score of every trial, in trial order
    pub scores: Vec<usize>,
    /// Item count of the smaller simulated population
    pub smaller_population: usize,
    pub common_items: usize,
}

/// Equal-width histogram over `[lower, upper]`, last bin closed on the right
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub lower: f64,
    pub upper: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn new(samples: &[f64], lower: f64, upper: f64, bins: usize) -> Histogram {
        let bins = bins.max(1);
        let bin_width = if upper > lower {
            (upper - lower) / bins as f64
        } else {
            1.0
        };
        let mut counts = vec![0usize; bins];
        for &sample in samples {
            if sample < lower || sample > upper {
                continue;
            }
            let mut bin = (((sample - lower) / bin_width) as usize).min(bins - 1);
            // the division can land an exact edge on either side of it
            if bin + 1 < bins && sample >= bin_edge(lower, upper, bins, bin + 1) {
                bin += 1;
            } else if bin > 0 && sample < bin_edge(lower, upper, bins, bin) {
                bin -= 1;
            }
            counts[bin] += 1;
        }
        Histogram {
            lower,
            upper,
            bin_width,
            counts,
        }
    }

    /// One bin per integer score `0..=max_score`
    pub fn unit_bins(samples: &[f64], max_score: usize) -> Histogram {
        Histogram::new(samples, 0.0, (max_score + 1) as f64, max_score + 1)
    }

    /// Left edge of every bin
    pub fn edges(&self) -> Vec<f64> {
        let bins = self.counts.len();
        (0..bins)
            .map(|i| bin_edge(self.lower, self.upper, bins, i))
            .collect()
    }
}

/// Left edge of bin `i`. Scaled before dividing so that `k / n` samples land
/// exactly on the edges they belong to.
fn bin_edge(lower: f64, upper: f64, bins: usize, i: usize) -> f64 {
    if upper > lower {
        lower + (upper - lower) * i as f64 / bins as f64
    } else {
        lower + i as f64
    }
}

/// Descriptive statistics of one distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub count: usize,
    pub mean: f64,
    /// Unbiased sample variance, 0 with fewer than two samples
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub histogram: Histogram,
}

/// The three views of a baseline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineReport {
    pub raw: DistributionSummary,
    pub by_smaller_population: Option<DistributionSummary>,
    pub by_common_items: Option<DistributionSummary>,
}

/// Where a real score falls in the null distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Significance {
    pub score: usize,
    /// `(1 + #{trials scoring >= score}) / (1 + trials)`
    pub p_value: f64,
    /// Absent when the null distribution has no spread
    pub z_score: Option<f64>,
}

pub struct BaselineSimulator {
    config: BaselineConfig,
}

impl BaselineSimulator {
    pub fn new(config: BaselineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BaselineConfig {
        &self.config
    }

    /// Run exactly `config.trials` independent trials.
    pub fn run(
        &self,
        sizes1: &ClusterSizes,
        sizes2: &ClusterSizes,
    ) -> Result<BaselineResult, OverlapError> {
        let total1: usize = sizes1.values().sum();
        let total2: usize = sizes2.values().sum();
        let common = self.config.common_items;

        if self.config.trials == 0 {
            return Err(OverlapError::InvalidParameter(
                "baseline needs at least one trial".to_string(),
            ));
        }
        if total1 == 0 || total2 == 0 {
            return Err(OverlapError::EmptyPartition);
        }
        if common > total1.min(total2) {
            return Err(OverlapError::InvalidParameter(format!(
                "{} common items exceed the smaller population of {}",
                common,
                total1.min(total2)
            )));
        }

        info!(
            "Starting baseline: {} trials, populations {} and {}, {} common items",
            self.config.trials, total1, total2, common
        );
        let start_time = Instant::now();

        let seeds: Vec<u64> = (0..self.config.trials as u64)
            .map(|trial| self.config.seed.wrapping_add(trial))
            .collect();
        let scores: Vec<usize> = if self.config.parallel {
            seeds
                .par_iter()
                .map(|&seed| run_trial(sizes1, sizes2, common, seed))
                .collect::<Result<_, _>>()?
        } else {
            seeds
                .iter()
                .map(|&seed| run_trial(sizes1, sizes2, common, seed))
                .collect::<Result<_, _>>()?
        };

        info!(
            "Baseline completed in {:?}",
            start_time.elapsed()
        );

        Ok(BaselineResult {
            scores,
            smaller_population: total1.min(total2),
            common_items: common,
        })
    }
}

/// One random trial: two random partitions, overlap matrix, optimal alignment score
pub fn run_trial(
    sizes1: &ClusterSizes,
    sizes2: &ClusterSizes,
    common: usize,
    seed: u64,
) -> Result<usize, OverlapError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let total1: usize = sizes1.values().sum();

    let clusters1 = random_partition(sizes1, &mut rng);
    let clusters2 = random_partition_with_common(sizes2, common, total1, &mut rng)?;

    let overlap = OverlapMatrix::between(&clusters1, &clusters2)?;
    let score = overlap.optimal_alignment().score;
    debug!("Trial with seed {} scored {}", seed, score);
    Ok(score)
}

pub fn raw_scores(result: &BaselineResult) -> Vec<f64> {
    result.scores.iter().map(|&s| s as f64).collect()
}

/// Scores as a fraction of the smaller population, `None` if it is empty
pub fn normalized_by_smaller(result: &BaselineResult) -> Option<Vec<f64>> {
    normalize(&result.scores, result.smaller_population)
}

/// Scores as a fraction of the common items, `None` if there are none
pub fn normalized_by_common(result: &BaselineResult) -> Option<Vec<f64>> {
    normalize(&result.scores, result.common_items)
}

fn normalize(scores: &[usize], denominator: usize) -> Option<Vec<f64>> {
    if denominator == 0 {
        return None;
    }
    Some(
        scores
            .iter()
            .map(|&s| s as f64 / denominator as f64)
            .collect(),
    )
}

/// Mean, variance and range of `samples` together with a precomputed histogram
pub fn summarize(samples: &[f64], histogram: Histogram) -> DistributionSummary {
    if samples.is_empty() {
        return DistributionSummary {
            count: 0,
            mean: 0.0,
            variance: 0.0,
            min: 0.0,
            max: 0.0,
            histogram,
        };
    }
    let mean = samples.iter().mean();
    let variance = if samples.len() < 2 {
        0.0
    } else {
        samples.iter().variance()
    };
    let min = samples.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = samples.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

    DistributionSummary {
        count: samples.len(),
        mean,
        variance,
        min,
        max,
        histogram,
    }
}

/// Summaries of the raw and both normalized score distributions
pub fn baseline_report(result: &BaselineResult, histogram_bins: usize) -> BaselineReport {
    let raw = raw_scores(result);
    let max_score = if result.common_items > 0 {
        result.common_items
    } else {
        result.scores.iter().copied().max().unwrap_or(0)
    };
    let raw_histogram = Histogram::unit_bins(&raw, max_score);

    let normalized_summary = |samples: Vec<f64>| {
        let histogram = Histogram::new(&samples, 0.0, 1.0, histogram_bins);
        summarize(&samples, histogram)
    };

    BaselineReport {
        raw: summarize(&raw, raw_histogram),
        by_smaller_population: normalized_by_smaller(result).map(normalized_summary),
        by_common_items: normalized_by_common(result).map(normalized_summary),
    }
}

/// Compare a real alignment score with the baseline scores
pub fn significance(score: usize, result: &BaselineResult) -> Significance {
    let trials = result.scores.len();
    let at_least = result.scores.iter().filter(|&&s| s >= score).count();
    let p_value = (1 + at_least) as f64 / (1 + trials) as f64;

    let raw = raw_scores(result);
    let z_score = if raw.len() < 2 {
        None
    } else {
        let std_dev = raw.iter().std_dev();
        if std_dev > 0.0 {
            Some((score as f64 - raw.iter().mean()) / std_dev)
        } else {
            None
        }
    };

    Significance {
        score,
        p_value,
        z_score,
    }
}
