/**
 * File: /src/lib.rs
 * Created Date: Wednesday, March 11th 2026
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-11		    	Cluster overlap analysis between experimental runs
 */
pub mod alignment;
pub mod baseline;
pub mod config;
pub mod matching;
pub mod matrix;
pub mod random_partition;
pub mod scoring;
pub mod source;
pub mod types;

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;

use chrono::Local;
use log::info;
use serde::{Deserialize, Serialize};

pub use alignment::{solve_alignment, Alignment};
pub use baseline::{BaselineConfig, BaselineReport, BaselineResult, BaselineSimulator, Significance};
pub use matrix::OverlapMatrix;
pub use scoring::{compare_partitions, Comparison};
pub use source::{MemorySource, NpyDirectorySource, PartitionSource, SourceError};
pub use types::{ClusterLabel, ClusterSizes, OverlapError, Partition};

const METHOD: &str = "cluster_overlap";

/// Everything one analysis produces, as written to the JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: String,
    pub first: String,
    pub second: String,
    pub comparison: Comparison,
    pub fraction_of_smaller: Option<f64>,
    pub fraction_of_common: Option<f64>,
    pub duplicates_first: usize,
    pub duplicates_second: usize,
    pub baseline_config: BaselineConfig,
    pub baseline: BaselineReport,
    pub significance: Significance,
}

/// Compare two runs and judge the alignment score against a random baseline.
///
/// `common_items` of `None` lets every item of the smaller run be shared;
/// it overrides `baseline_config.common_items` once both runs are loaded.
pub fn analyze<S1, S2, T>(
    first: &S1,
    second: &S2,
    mut baseline_config: BaselineConfig,
    common_items: Option<usize>,
) -> Result<AnalysisReport, Box<dyn Error>>
where
    S1: PartitionSource<Item = T>,
    S2: PartitionSource<Item = T>,
    T: PartialEq + Sync,
{
    info!("[method: {}] [{}] Loading {}", METHOD, timestamp(), first.describe());
    let clusters1 = first.load()?;
    info!("[method: {}] [{}] Loading {}", METHOD, timestamp(), second.describe());
    let clusters2 = second.load()?;

    baseline_config.common_items = common_items
        .unwrap_or_else(|| clusters1.total_items().min(clusters2.total_items()));
    analyze_partitions(
        (first.describe(), &clusters1),
        (second.describe(), &clusters2),
        baseline_config,
    )
}

/// Same as [`analyze`] for partitions that are already loaded
pub fn analyze_partitions<L1, L2, T>(
    (first, clusters1): (String, &Partition<L1, T>),
    (second, clusters2): (String, &Partition<L2, T>),
    baseline_config: BaselineConfig,
) -> Result<AnalysisReport, Box<dyn Error>>
where
    L1: ClusterLabel,
    L2: ClusterLabel,
    T: PartialEq + Sync,
{
    source::log_cluster_sizes(&first, clusters1);
    source::log_cluster_sizes(&second, clusters2);

    let duplicates_first = matching::verify_no_repeats(clusters1);
    let duplicates_second = matching::verify_no_repeats(clusters2);

    let comparison = compare_partitions(clusters1, clusters2)?;

    let sizes1 = clusters1.cluster_sizes()?;
    let sizes2 = clusters2.cluster_sizes()?;
    let simulator = BaselineSimulator::new(baseline_config);
    let baseline_result = simulator.run(&sizes1, &sizes2)?;
    let baseline = baseline::baseline_report(&baseline_result, simulator.config().histogram_bins);
    let significance = baseline::significance(comparison.alignment.score, &baseline_result);

    info!(
        "[method: {}] [{}] Aligned matches: {} of {} (p = {:.4})",
        METHOD,
        timestamp(),
        comparison.alignment.score,
        scoring::smaller_population(&comparison),
        significance.p_value
    );
    info!(
        "[method: {}] [{}] Baseline mean: {:.3}, variance: {:.3}, min: {}, max: {}",
        METHOD,
        timestamp(),
        baseline.raw.mean,
        baseline.raw.variance,
        baseline.raw.min,
        baseline.raw.max
    );

    Ok(AnalysisReport {
        generated_at: Local::now().to_rfc3339(),
        first,
        second,
        fraction_of_smaller: scoring::fraction_of_smaller(&comparison),
        fraction_of_common: scoring::fraction_of_common(&comparison, baseline_result.common_items),
        comparison,
        duplicates_first,
        duplicates_second,
        baseline_config: simulator.config().clone(),
        baseline,
        significance,
    })
}

/// Entry point of the binary: load both runs from `.npy` directories and analyze them
pub fn run(configuration: &config::Config) -> Result<AnalysisReport, Box<dyn Error>> {
    let first = NpyDirectorySource::<f32>::new(configuration.get_run1_dir());
    let second = NpyDirectorySource::<f32>::new(configuration.get_run2_dir());

    let report = analyze(
        &first,
        &second,
        configuration.baseline_config(),
        configuration.get_common(),
    )?;

    if let Some(path) = configuration.get_report() {
        write_report(&report, path)?;
        info!("Report written to {}", path.display());
    }
    Ok(report)
}

pub fn write_report(report: &AnalysisReport, path: &std::path::Path) -> Result<(), Box<dyn Error>> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

fn timestamp() -> String {
    // Get the current time
    Local::now().format("%H:%M:%S").to_string()
}
