//! The module responsible for writing output data to disk.
use crate::leg::LegID;
use crate::time_range::TimeStampedTable;
use crate::vehicle::VehicleID;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use itertools::chain;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The root folder in which scenario-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "chaproev_results";

/// The output file name for the electricity-use series
const ELECTRICITY_USE_FILE_NAME: &str = "electricity_use.csv";

/// The output file name for the timestamped table scaffold
const TIME_STAMPED_TABLE_FILE_NAME: &str = "time_stamped_table.csv";

/// The format in which grid timestamps are written
const TIME_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Get the output directory for the scenario at the specified path
pub fn get_output_dir(scenario_file_path: &Path) -> Result<PathBuf> {
    // Canonicalise in case the user has specified a relative path
    let scenario_file_path = scenario_file_path
        .canonicalize()
        .context("Could not resolve path to scenario file")?;

    let scenario_name = scenario_file_path
        .file_stem()
        .context("Scenario file has no name")?
        .to_str()
        .context("Invalid chars in scenario file name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, scenario_name].iter().collect())
}

/// Create a new output directory for the scenario, with parents.
pub fn create_output_directory(output_dir: &Path) -> Result<()> {
    if output_dir.is_dir() {
        // already exists
        return Ok(());
    }

    fs::create_dir_all(output_dir)?;

    Ok(())
}

/// Format a grid timestamp for output files
pub fn format_time_stamp(time_stamp: NaiveDateTime) -> String {
    time_stamp.format(TIME_STAMP_FORMAT).to_string()
}

/// Represents a row in the electricity-use CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ElectricityUseRow {
    /// The grid timestamp of the evaluation
    pub time_stamp: String,
    /// The hour number of the grid timestamp
    pub hour_number: i64,
    /// The evaluated leg
    pub leg: LegID,
    /// The vehicle driving the leg
    pub vehicle: VehicleID,
    /// The computed electricity use in kWh
    pub electricity_use_kwh: f64,
}

/// Write the electricity-use series to a CSV file in the output directory.
pub fn write_electricity_use(output_dir: &Path, rows: &[ElectricityUseRow]) -> Result<()> {
    let file_path = output_dir.join(ELECTRICITY_USE_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)
        .with_context(|| format!("Could not create {}", file_path.to_string_lossy()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the timestamped table scaffold to a CSV file in the output directory.
///
/// Location columns are written empty; downstream consumers fill them in.
pub fn write_timestamped_table(output_dir: &Path, table: &TimeStampedTable) -> Result<()> {
    let file_path = output_dir.join(TIME_STAMPED_TABLE_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)
        .with_context(|| format!("Could not create {}", file_path.to_string_lossy()))?;

    let header = chain(
        ["time_stamp", "hour_number", "spine_hour_number"],
        table.location_values.keys().map(|id| id.0.as_ref()),
    );
    writer.write_record(header)?;

    for (row, (time_stamp, hour_number)) in table
        .time_stamps
        .iter()
        .zip(&table.hour_numbers)
        .enumerate()
    {
        let location_cells = table.location_values.values().map(|column| {
            column[row]
                .map(|value| value.to_string())
                .unwrap_or_default()
        });
        let record = chain(
            [
                format_time_stamp(*time_stamp),
                hour_number.to_string(),
                table.spine_hour_numbers[row].clone(),
            ],
            location_cells,
        );
        writer.write_record(record)?;
    }
    writer.flush()?;

    Ok(())
}
