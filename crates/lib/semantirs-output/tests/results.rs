use std::fs::{self, File};
use std::path::PathBuf;

use indexmap::IndexMap;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use semantirs_models::offload::mode::OffloadMode;
use semantirs_models::offload::transmitter::OffloadSettings;
use semantirs_output::report::{Report, ReportSettings, Verdict};
use semantirs_output::result::{OutputSettings, OutputType, Outputs, Results};
use semantirs_output::stats::{summarize, SampleSets};
use semantirs_testutils::fleet::{diagonal_fleet, square_rsus};
use semantirs_testutils::models::make_transmitter;

fn simulate(samples_per_mode: usize) -> SampleSets {
    let rsus = square_rsus();
    let fleet = diagonal_fleet(12);
    let mut transmitter = make_transmitter(&OffloadSettings::default(), &rsus, 42).unwrap();
    let mut sets: SampleSets = IndexMap::new();
    for mode in OffloadMode::ALL {
        let samples = (0..samples_per_mode)
            .map(|i| {
                transmitter
                    .sample(&fleet[i % fleet.len()], &rsus[i % rsus.len()], mode)
                    .unwrap()
            })
            .collect();
        sets.insert(mode, samples);
    }
    sets
}

fn output_settings(name: &str, extension: &str) -> OutputSettings {
    let run = std::process::id();
    let root = std::env::temp_dir().join(format!("semantirs-output-{}-{}", run, name));
    if root.exists() {
        fs::remove_dir_all(&root).unwrap();
    }
    let output = |output_type, stem: &str| Outputs {
        output_type,
        output_filename: format!("{}.{}", stem, extension),
    };
    OutputSettings {
        output_path: root.to_string_lossy().to_string(),
        outputs: vec![
            output(OutputType::Samples, "samples"),
            output(OutputType::Summary, "summary"),
            output(OutputType::Comparison, "comparison"),
            output(OutputType::LatencyCdf, "latency_cdf"),
            Outputs {
                output_type: OutputType::Report,
                output_filename: "report.txt".to_string(),
            },
        ],
        scenario_id: 1,
    }
}

fn write_all(settings: &OutputSettings, sets: &SampleSets) -> PathBuf {
    let summaries = summarize(sets).unwrap();
    let report = Report::build("roundtrip", &summaries, &ReportSettings::default());
    let mut results = Results::new(settings).unwrap();
    results.add_samples(sets).unwrap();
    results.add_analysis(&summaries, &report).unwrap();
    results.write_to_file().unwrap();
    results.close_files().unwrap();
    settings.files_dir()
}

#[test]
fn test_summary_improvements_relative_to_raw() {
    let sets = simulate(60);
    let summaries = summarize(&sets).unwrap();
    assert_eq!(summaries.len(), 3);
    let raw = &summaries[0];
    assert_eq!(raw.latency_reduction, Some(0.0));
    assert_eq!(raw.irs_gain, 0.0);
    assert_eq!(raw.compression_pct, 0.0);

    let irs = &summaries[2];
    assert!((irs.compression_pct - 90.0).abs() < 1e-9);
    assert!(irs.irs_gain >= 6.0 && irs.irs_gain <= 12.0);
    assert!(irs.median_latency <= irs.p95_latency);
    assert!(irs.latency_reduction.unwrap() > 0.0);
}

#[test]
fn test_empty_mode_is_rejected() {
    let mut sets = simulate(5);
    sets.insert(OffloadMode::Semantic, Vec::new());
    assert!(summarize(&sets).is_err());
}

#[test]
fn test_csv_outputs() {
    let sets = simulate(30);
    let dir = write_all(&output_settings("csv", "csv"), &sets);

    let samples = fs::read_to_string(dir.join("samples.csv")).unwrap();
    let mut lines = samples.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("vehicle_id,target_id,serving_id,mode,raw_data_kb"));
    assert!(header.ends_with("energy_consumption_mj,packet_success"));
    assert_eq!(lines.count(), 90);

    let cdf = fs::read_to_string(dir.join("latency_cdf.csv")).unwrap();
    assert_eq!(cdf.lines().count(), 91);

    let comparison = fs::read_to_string(dir.join("comparison.csv")).unwrap();
    assert_eq!(comparison.lines().count(), 15);
    assert!(comparison.contains("Mean Latency (ms)"));

    let report = fs::read_to_string(dir.join("report.txt")).unwrap();
    assert!(report.contains("Scenario: roundtrip"));
    assert!(report.contains("claims met"));
}

#[test]
fn test_parquet_samples_readable() {
    let sets = simulate(20);
    let dir = write_all(&output_settings("parquet", "parquet"), &sets);
    let file = File::open(dir.join("samples.parquet")).unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    let rows: usize = reader.map(|batch| batch.unwrap().num_rows()).sum();
    assert_eq!(rows, 60);
}

#[test]
fn test_report_checks_subject_mode() {
    let sets = simulate(40);
    let summaries = summarize(&sets).unwrap();
    let report = Report::build("claims", &summaries, &ReportSettings::default());
    let gain = report
        .checks
        .iter()
        .find(|check| check.claim.name == "IRS gain")
        .unwrap();
    let achieved = gain.achieved.unwrap();
    match achieved > 10.0 {
        true => assert_eq!(gain.verdict, Verdict::Above),
        false => assert_eq!(gain.verdict, Verdict::Met),
    }
}
