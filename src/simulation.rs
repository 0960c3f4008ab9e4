//! Functionality for running a loaded scenario model.
//!
//! For each timestamp of the time grid, the electricity use of every (leg, vehicle) pair is
//! evaluated and the results are written to the output directory. The first failing evaluation
//! aborts the run; no partial or default results are substituted.
use crate::model::Model;
use crate::output::{
    ElectricityUseRow, format_time_stamp, write_electricity_use, write_timestamped_table,
};
use crate::time_range::{build_timestamped_table, generate_time_range};
use crate::weather::WeatherSource;
use anyhow::Result;
use itertools::Itertools;
use log::info;
use std::path::Path;

/// Run the simulation for the given model, writing results to `output_dir`.
///
/// # Arguments
///
/// * `model` - The loaded scenario model
/// * `weather` - The source answering temperature queries for leg endpoints
/// * `output_dir` - The folder to write output files to
pub fn run(model: &Model, weather: &dyn WeatherSource, output_dir: &Path) -> Result<()> {
    let (time_stamps, hour_numbers) = generate_time_range(&model.run, &model.time)?;
    info!(
        "Generated a time grid with {} time stamps for {} legs and {} vehicles",
        time_stamps.len(),
        model.legs.len(),
        model.vehicles.len()
    );

    let mut rows = Vec::with_capacity(time_stamps.len() * model.legs.len() * model.vehicles.len());
    for (time_stamp, hour_number) in time_stamps.iter().zip(&hour_numbers) {
        for (leg, vehicle) in model
            .legs
            .values()
            .cartesian_product(model.vehicles.values())
        {
            let electricity_use =
                leg.electricity_use_kwh(*time_stamp, vehicle, &model.road_types, weather)?;
            rows.push(ElectricityUseRow {
                time_stamp: format_time_stamp(*time_stamp),
                hour_number: *hour_number,
                leg: leg.id.clone(),
                vehicle: vehicle.id.clone(),
                electricity_use_kwh: electricity_use.value(),
            });
        }
    }
    write_electricity_use(output_dir, &rows)?;

    let table = build_timestamped_table(&model.run, &model.time, &model.locations)?;
    write_timestamped_table(output_dir, &table)?;

    info!(
        "Wrote {} electricity-use rows to {}",
        rows.len(),
        output_dir.to_string_lossy()
    );

    Ok(())
}
