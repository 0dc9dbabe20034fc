//! Integration tests for run comparison
//!
//! Covers the full flow:
//! 1. Loading partitions (in memory and from .npy directories)
//! 2. Overlap matrix + optimal alignment
//! 3. Random baseline and significance

use cluster_overlap::baseline::{baseline_report, significance};
use cluster_overlap::config::Config;
use cluster_overlap::matching::{count_exact_matches, verify_no_repeats};
use cluster_overlap::random_partition::{random_partition, random_partition_with_common};
use cluster_overlap::*;
use ndarray::{Array2, ArrayD};
use ndarray_npy::WriteNpyExt;
use ndarray_rand::rand::rngs::StdRng as TestRng;
use ndarray_rand::rand::SeedableRng as TestSeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `n` distinct random 8x8 "images"
fn random_images(n: usize, seed: u64) -> Vec<Array2<f32>> {
    let mut rng = TestRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Array2::random_using((8, 8), Uniform::new(0.0f32, 1.0), &mut rng))
        .collect()
}

/// Split `images` into clusters of the given sizes, cluster `i` labeled `i`
fn clusters_of(images: &[Array2<f32>], sizes: &[usize]) -> Partition<usize, Array2<f32>> {
    let mut offset = 0;
    sizes
        .iter()
        .enumerate()
        .map(|(label, &size)| {
            let items = images[offset..offset + size].to_vec();
            offset += size;
            (label, items)
        })
        .collect()
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cluster_overlap_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_run(root: &Path, partition: &Partition<usize, Array2<f32>>) {
    for (label, images) in partition {
        let cluster_dir = root.join(label.to_string());
        fs::create_dir_all(&cluster_dir).unwrap();
        for (i, image) in images.iter().enumerate() {
            let file = File::create(cluster_dir.join(format!("{}.npy", i))).unwrap();
            image.write_npy(file).unwrap();
        }
    }
}

fn small_baseline(trials: usize) -> BaselineConfig {
    BaselineConfig {
        trials,
        parallel: false,
        ..Default::default()
    }
}

#[test]
fn test_self_comparison_scores_every_item() {
    init_logger();
    let images = random_images(4 * 5, 1);
    let partition = clusters_of(&images, &[5, 5, 5, 5]);

    let matrix = OverlapMatrix::between(&partition, &partition).unwrap();
    let alignment = matrix.optimal_alignment();

    assert_eq!(alignment.score, 20);
    assert!(alignment.is_identity());
    assert_eq!(matrix.total(), 20);
}

#[test]
fn test_cross_label_scenario() {
    init_logger();
    let p1: Partition<usize, &str> = vec![(0, vec!["a", "b"]), (1, vec!["c"])].into_iter().collect();
    let p2: Partition<usize, &str> = vec![(0, vec!["c"]), (1, vec!["a", "b"])].into_iter().collect();

    let matrix = OverlapMatrix::between(&p1, &p2).unwrap();
    assert_eq!(matrix.rows(), vec![vec![0, 2], vec![1, 0]]);

    let alignment = matrix.optimal_alignment();
    assert_eq!(alignment.score, 3);
    assert_eq!(alignment.assignment, vec![1, 0]);
}

#[test]
fn test_disjoint_universes_score_zero() {
    init_logger();
    let images = random_images(12, 2);
    let p1 = clusters_of(&images[..6], &[2, 4]);
    let p2 = clusters_of(&images[6..], &[3, 3]);

    let matrix = OverlapMatrix::between(&p1, &p2).unwrap();
    assert_eq!(matrix.total(), 0);
    assert_eq!(matrix.optimal_alignment().score, 0);
}

#[test]
fn test_score_bounded_by_smaller_population() {
    init_logger();
    let sizes1: ClusterSizes = vec![(0, 17), (1, 1), (2, 1), (3, 40), (4, 20)].into_iter().collect();
    let sizes2: ClusterSizes = vec![(0, 30), (1, 12), (2, 5)].into_iter().collect();
    let total1: usize = sizes1.values().sum();
    let total2: usize = sizes2.values().sum();

    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let p1 = random_partition(&sizes1, &mut rng);
        let p2 = random_partition_with_common(&sizes2, 25, total1, &mut rng).unwrap();

        let matrix = OverlapMatrix::between(&p1, &p2).unwrap();
        let alignment = matrix.optimal_alignment();
        let along: usize = alignment.pairs().map(|(r, c)| matrix[(r, c)]).sum();

        assert_eq!(along, alignment.score);
        assert!(alignment.score <= total1.min(total2));
        assert!(alignment.score <= 25);
        assert!(alignment.score <= matrix.total());
    }
}

#[test]
fn test_exact_match_asymmetry_under_duplicates() {
    let images = random_images(2, 3);
    let with_duplicate = vec![images[0].clone(), images[0].clone(), images[1].clone()];
    let single = vec![images[0].clone()];

    assert_eq!(count_exact_matches(&with_duplicate, &single), 2);
    assert_eq!(count_exact_matches(&single, &with_duplicate), 1);
    assert_eq!(count_exact_matches(&images, &images), 2);
}

#[test]
fn test_analyze_in_memory_runs() {
    init_logger();
    let images = random_images(30, 4);
    let run1 = clusters_of(&images[..20], &[8, 7, 5]);
    // same first 20 images regrouped under other labels, plus 10 unseen images
    let mut run2: Partition<usize, Array2<f32>> = Partition::new();
    run2.insert(0, images[13..20].to_vec());
    run2.insert(1, images[..8].to_vec());
    run2.insert(2, images[8..13].iter().chain(&images[20..]).cloned().collect());

    let report = analyze(
        &MemorySource::new(run1),
        &MemorySource::new(run2),
        small_baseline(50),
        None,
    )
    .unwrap();

    // rows: [0, 8, 0], [2, 0, 5], [5, 0, 0]
    assert_eq!(report.comparison.overlap[1], vec![2, 0, 5]);
    assert_eq!(report.comparison.alignment.score, 18);
    assert_eq!(report.comparison.alignment.assignment, vec![1, 2, 0]);
    assert_eq!(report.baseline_config.common_items, 20);
    assert!((report.fraction_of_smaller.unwrap() - 0.9).abs() < 1e-12);
    assert_eq!(report.duplicates_first, 0);
    assert_eq!(report.baseline.raw.count, 50);
    assert!(report.significance.p_value < 0.05);
}

#[test]
fn test_duplicates_do_not_abort_analysis() {
    init_logger();
    let images = random_images(4, 5);
    let mut run: Partition<usize, Array2<f32>> = Partition::new();
    run.insert(0, vec![images[0].clone(), images[1].clone()]);
    run.insert(1, vec![images[1].clone(), images[2].clone(), images[3].clone()]);

    assert_eq!(verify_no_repeats(&run), 2);

    let report = analyze_partitions(
        ("first".to_string(), &run),
        ("second".to_string(), &run),
        BaselineConfig {
            common_items: 5,
            ..small_baseline(10)
        },
    )
    .unwrap();
    assert_eq!(report.duplicates_first, 2);
    assert_eq!(report.comparison.alignment.score, 5);
}

#[test]
fn test_npy_directory_runs() {
    init_logger();
    let root = scratch_dir("npy_runs");
    let images = random_images(9, 6);

    let run1 = clusters_of(&images, &[4, 3, 2]);
    let mut run2: Partition<usize, Array2<f32>> = Partition::new();
    run2.insert(0, images[7..9].to_vec());
    run2.insert(1, images[..4].to_vec());
    run2.insert(2, images[4..7].to_vec());

    let run1_dir = root.join("run1");
    let run2_dir = root.join("run0");
    write_run(&run1_dir, &run1);
    write_run(&run2_dir, &run2);
    // stray files are ignored
    fs::write(run1_dir.join("notes.txt"), "not a cluster").unwrap();
    fs::write(run1_dir.join("0").join("thumbs.db"), "not an item").unwrap();

    let source = NpyDirectorySource::<f32>::new(&run1_dir);
    let loaded = source.load().unwrap();
    assert_eq!(loaded.num_clusters(), 3);
    assert_eq!(loaded.total_items(), 9);
    let first: &ArrayD<f32> = &loaded.get(&"0".to_string()).unwrap()[0];
    assert_eq!(first, &images[0].clone().into_dyn());

    let report_path = root.join("report.json");
    let args = vec![
        "cluster_overlap".to_string(),
        run1_dir.to_string_lossy().into_owned(),
        run2_dir.to_string_lossy().into_owned(),
        "25".to_string(),
        "auto".to_string(),
        "3".to_string(),
        report_path.to_string_lossy().into_owned(),
    ];
    let configuration = Config::new(args.into_iter()).unwrap();
    let report = run(&configuration).unwrap();

    assert_eq!(report.comparison.overlap, vec![vec![0, 4, 0], vec![0, 0, 3], vec![2, 0, 0]]);
    assert_eq!(report.comparison.alignment.score, 9);

    let written: AnalysisReport =
        serde_json::from_reader(File::open(&report_path).unwrap()).unwrap();
    assert_eq!(written.comparison, report.comparison);
    assert_eq!(written.baseline.raw.count, 25);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn test_non_numeric_cluster_directory_fails() {
    init_logger();
    let root = scratch_dir("bad_labels");
    let images = random_images(2, 7);
    let cluster_dir = root.join("cluster_a");
    fs::create_dir_all(&cluster_dir).unwrap();
    images[0].write_npy(File::create(cluster_dir.join("0.npy")).unwrap()).unwrap();

    let source = NpyDirectorySource::<f32>::new(&root);
    let partition = source.load().unwrap();
    assert!(matches!(
        OverlapMatrix::between(&partition, &partition),
        Err(OverlapError::LabelFormat(_))
    ));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn test_baseline_report_against_real_score() {
    init_logger();
    let sizes: ClusterSizes = vec![(0, 10), (1, 10), (2, 10)].into_iter().collect();
    let simulator = BaselineSimulator::new(BaselineConfig {
        trials: 200,
        common_items: 30,
        seed: 9,
        ..Default::default()
    });
    let result = simulator.run(&sizes, &sizes).unwrap();
    let report = baseline_report(&result, 10);

    assert_eq!(report.raw.count, 200);
    assert!(report.raw.mean > 0.0 && report.raw.mean < 30.0);
    assert_eq!(report.raw.histogram.counts.iter().sum::<usize>(), 200);
    let by_common = report.by_common_items.unwrap();
    assert!((by_common.mean - report.raw.mean / 30.0).abs() < 1e-9);

    // a perfect recovery of all 30 items is far outside the null
    let perfect = significance(30, &result);
    assert!(perfect.p_value <= 1.0 / 201.0 + 1e-12);
    assert!(perfect.z_score.unwrap() > 3.0);
}

#[test]
fn test_corrupt_npy_file_reports_its_path() {
    init_logger();
    let root = scratch_dir("corrupt_npy");
    let images = random_images(1, 8);
    let good_dir = root.join("0");
    let bad_dir = root.join("1");
    fs::create_dir_all(&good_dir).unwrap();
    fs::create_dir_all(&bad_dir).unwrap();
    images[0].write_npy(File::create(good_dir.join("0.npy")).unwrap()).unwrap();
    let bad_file = bad_dir.join("0.npy");
    fs::write(&bad_file, b"definitely not an npy header").unwrap();

    let source = NpyDirectorySource::<f32>::new(&root);
    assert_eq!(source.root(), root.as_path());
    match source.load() {
        Err(SourceError::Npy { path, .. }) => assert_eq!(path, bad_file),
        other => panic!("Expected Npy error, got {:?}", other.map(|p| p.total_items())),
    }

    let error = source.load().unwrap_err();
    assert!(error.to_string().contains("Failed to decode"));
    assert!(std::error::Error::source(&error).is_some());

    let _ = fs::remove_dir_all(&root);
}
