//! Integration tests for the `summary` command.
use enr_auctions::cli::{SummaryOpts, handle_summary_command};
use enr_auctions::settings::Settings;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Get the path to the demo dataset.
fn get_data_file() -> PathBuf {
    PathBuf::from("demos/auctions.csv")
}

/// Read the header and rows of a CSV output file
fn read_output(dir: &Path, file_name: &str) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(dir.join(file_name))
        .unwrap()
        .into_records()
        .map(|record| record.unwrap().iter().map(String::from).collect())
        .collect()
}

/// An integration test for the `summary` command.
#[test]
fn test_handle_summary_command() {
    unsafe { std::env::set_var("ENR_AUCTIONS_LOG_LEVEL", "off") };

    let tempdir = tempdir().unwrap();

    // Save results to non-existent directory to check that directory creation works
    let output_dir = tempdir.path().join("results");
    let opts = SummaryOpts {
        from: Some("2020-01".into()),
        to: Some("2021-12".into()),
        energy_type: Some("Solar".into()),
        top_n: Some(3),
        output_dir: Some(output_dir.clone()),
        ..SummaryOpts::default()
    };
    handle_summary_command(&get_data_file(), &opts, Some(Settings::default())).unwrap();

    for file_name in [
        "regional_statistics.csv",
        "regional_summary.csv",
        "top_regions.csv",
        "volume_over_time.csv",
        "seasonal_share.csv",
        "map.csv",
        "enr_auctions_info.log",
        "enr_auctions_error.log",
    ] {
        assert!(output_dir.join(file_name).is_file(), "{file_name} missing");
    }
    assert!(!output_dir.join("energy_mix.csv").exists());

    // Three regions plus "Other regions"
    let top_regions = read_output(&output_dir, "top_regions.csv");
    assert_eq!(top_regions.len(), 5);
    assert_eq!(top_regions[0], ["region", "value"]);
    assert_eq!(top_regions[1][0], "Other regions");
    assert_eq!(top_regions[4][0], "Occitanie");

    // Ranked by solar volume, with regions that sold no solar last
    let summary = read_output(&output_dir, "regional_summary.csv");
    let solar = summary[0].iter().position(|col| col == "Solar").unwrap();
    assert_eq!(summary[1][0], "Occitanie");
    assert_eq!(summary[1][1], "4.63 M€");
    assert_eq!(summary[1][solar], "2.56 M€");
    let last = summary.last().unwrap();
    assert_eq!(last[0], "Pays de la Loire");
    assert_eq!(last[solar], "No data");

    // The second run fails because the logger is already initialised
    let opts = SummaryOpts {
        output_dir: Some(tempdir.path().join("second")),
        ..SummaryOpts::default()
    };
    assert_eq!(
        handle_summary_command(&get_data_file(), &opts, Some(Settings::default()))
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        "Failed to initialise logging."
    );
}

/// The output directory is only replaced when overwriting is enabled
#[test]
fn test_handle_summary_command_existing_output() {
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    fs::create_dir(&output_dir).unwrap();
    fs::write(output_dir.join("notes.txt"), "keep me").unwrap();

    let opts = SummaryOpts {
        output_dir: Some(output_dir.clone()),
        ..SummaryOpts::default()
    };
    let err =
        handle_summary_command(&get_data_file(), &opts, Some(Settings::default())).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Failed to create output directory: {}", output_dir.display())
    );
    assert!(output_dir.join("notes.txt").is_file());
}
