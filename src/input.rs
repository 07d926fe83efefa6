//! Common routines for handling input data.
use crate::record::AuctionRecord;
use anyhow::{Context, Result, ensure};
use log::info;
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::fs;
use std::path::Path;

/// Format an error message to include the file path
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Read a series of type `T`s from a CSV file.
///
/// Columns are matched to fields by header name; extra columns are ignored.
///
/// # Arguments
///
/// * `file_path`: Path to the CSV file
pub fn read_csv<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let mut reader =
        csv::Reader::from_path(file_path).with_context(|| input_err_msg(file_path))?;

    let vec = reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .with_context(|| input_err_msg(file_path))?;
    ensure!(
        !vec.is_empty(),
        "{}: CSV file cannot be empty",
        input_err_msg(file_path)
    );

    Ok(vec)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Check that an auction record is well formed
fn check_record(record: &AuctionRecord) -> Result<()> {
    let volume = record.total_volume_sold.value();
    ensure!(
        volume.is_finite() && volume >= 0.0,
        "Invalid volume {volume} for {} in {}: must be a non-negative number",
        record.region,
        record.date
    );

    Ok(())
}

/// Check all records, adding the row number to any error
fn check_records<T: Display>(records: &[AuctionRecord], source: T) -> Result<()> {
    for (idx, record) in records.iter().enumerate() {
        // Row 1 is the header
        check_record(record).with_context(|| format!("{source}: row {}", idx + 2))?;
    }

    Ok(())
}

/// Read the auction dataset from a CSV file.
///
/// The file must have the columns `date` (`YYYY-MM`), `region`, `energy_type` and
/// `total_volume_sold`. Volumes must be non-negative.
pub fn read_records(file_path: &Path) -> Result<Vec<AuctionRecord>> {
    let records: Vec<AuctionRecord> = read_csv(file_path)?;
    check_records(&records, input_err_msg(file_path))?;
    info!(
        "Read {} auction records from {}",
        records.len(),
        file_path.display()
    );

    Ok(records)
}
