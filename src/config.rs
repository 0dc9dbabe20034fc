/**
 * File: /src/config.rs
 * Created Date: Wednesday, March 11th 2026
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-11		    	Command-line configuration for run comparison
 */
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::baseline::BaselineConfig;

pub const USAGE: &str =
    "usage: cluster_overlap <run1_dir> <run2_dir> [trials=1000] [common=auto] [seed=42] [report.json]";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // one sub-directory per cluster, one .npy per item
    run1_dir: PathBuf,
    run2_dir: PathBuf,
    trials:   usize,
    // None: every item of the smaller run may be shared
    common:   Option<usize>,
    seed:     u64,
    report:   Option<PathBuf>,
}

impl Config {
    /// constructor
    ///
    /// # Examples
    /// ```bash
    /// $ cargo run -- results/run1/obs_to_min_states results/run0/obs_to_min_states 1000 auto 42
    /// ```
    pub fn new(
        mut args: impl Iterator<Item = String>,
    ) -> Result<Config, Box<dyn std::error::Error>> {
        // args:
        // 0: program name
        // 1: run1 directory
        // 2: run2 directory
        // 3: trials (optional)
        // 4: common items or "auto" (optional)
        // 5: seed (optional)
        // 6: report path (optional)
        args.next();
        let run1_dir = PathBuf::from(args.next().ok_or("missing run1 directory")?);
        let run2_dir = PathBuf::from(args.next().ok_or("missing run2 directory")?);
        let trials = match args.next() {
            Some(arg) => arg.parse::<usize>()?,
            None => 1000,
        };
        let common = match args.next().as_deref() {
            None | Some("auto") => None,
            Some(arg) => Some(arg.parse::<usize>()?),
        };
        let seed = match args.next() {
            Some(arg) => arg.parse::<u64>()?,
            None => 42,
        };
        let report = args.next().map(PathBuf::from);

        if trials == 0 {
            return Err("trials must be at least 1".into());
        }

        Ok(Config {
            run1_dir,
            run2_dir,
            trials,
            common,
            seed,
            report,
        })
    }

    pub fn get_run1_dir(&self) -> &PathBuf {
        &self.run1_dir
    }

    pub fn get_run2_dir(&self) -> &PathBuf {
        &self.run2_dir
    }

    pub fn get_trials(&self) -> usize {
        self.trials
    }

    pub fn get_common(&self) -> Option<usize> {
        self.common
    }

    pub fn get_seed(&self) -> u64 {
        self.seed
    }

    pub fn get_report(&self) -> Option<&PathBuf> {
        self.report.as_ref()
    }

    /// Simulation settings; the common-item count is resolved after loading
    pub fn baseline_config(&self) -> BaselineConfig {
        BaselineConfig {
            trials: self.trials,
            common_items: self.common.unwrap_or(0),
            seed: self.seed,
            ..Default::default()
        }
    }
}
