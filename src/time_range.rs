//! Code for generating the time grid of a run.
//!
//! The grid is the ordered sequence of timestamps the simulation iterates over, together with the
//! hour number of each timestamp (a running count of hours since the start of its calendar year)
//! and a zero-padded "spine" label used for interchange with external modelling tools.
use crate::location::{LocationID, LocationMap};
use anyhow::{Context, Result, ensure};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_string_enum::DeserializeLabeledStringEnum;

/// A run boundary instant, as component fields read from the scenario file.
#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
pub struct DateTimeSpec {
    /// Calendar year
    pub year: i32,
    /// Calendar month (1-12)
    pub month: u32,
    /// Day of month (1-31)
    pub day: u32,
    /// Hour of day (0-23)
    pub hour: u32,
    /// Minute of hour (0-59)
    pub minute: u32,
}

impl DateTimeSpec {
    /// Convert the component fields into a timestamp.
    ///
    /// Fails if any field is out of valid calendar range.
    pub fn to_time_stamp(self) -> Result<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .with_context(|| {
                format!("Invalid date {}-{:02}-{:02}", self.year, self.month, self.day)
            })?
            .and_hms_opt(self.hour, self.minute, 0)
            .with_context(|| format!("Invalid time {:02}:{:02}", self.hour, self.minute))
    }
}

/// The unit token of the run frequency
#[derive(DeserializeLabeledStringEnum, Debug, PartialEq, Clone, Copy)]
pub enum FrequencyUnit {
    /// Steps of whole seconds
    #[string = "seconds"]
    Seconds,
    /// Steps of whole minutes
    #[string = "minutes"]
    Minutes,
    /// Steps of whole hours
    #[string = "hours"]
    Hours,
    /// Steps of whole days
    #[string = "days"]
    Days,
    /// Steps of whole weeks
    #[string = "weeks"]
    Weeks,
}

/// Represents the "run.frequency" section of the scenario file.
#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
pub struct RunFrequency {
    /// The number of units per step
    pub size: i64,
    /// The unit of the step
    #[serde(rename = "type")]
    pub unit: FrequencyUnit,
}

impl RunFrequency {
    /// The step between consecutive grid timestamps.
    ///
    /// Fails if the size is not positive.
    pub fn step(self) -> Result<TimeDelta> {
        ensure!(
            self.size > 0,
            "run.frequency.size must be positive (got {})",
            self.size
        );

        let step = match self.unit {
            FrequencyUnit::Seconds => TimeDelta::seconds(self.size),
            FrequencyUnit::Minutes => TimeDelta::minutes(self.size),
            FrequencyUnit::Hours => TimeDelta::hours(self.size),
            FrequencyUnit::Days => TimeDelta::days(self.size),
            FrequencyUnit::Weeks => TimeDelta::weeks(self.size),
        };
        Ok(step)
    }
}

/// Represents the "run" section of the scenario file.
#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
pub struct RunParameters {
    /// When the run starts (inclusive)
    pub start: DateTimeSpec,
    /// When the run ends (exclusive)
    pub end: DateTimeSpec,
    /// The spacing of the time grid
    pub frequency: RunFrequency,
}

/// Default number of seconds per hour
fn default_seconds_per_hour() -> i64 {
    3600
}

/// Represents the "time" section of the scenario file.
#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
pub struct TimeParameters {
    /// Seconds per hour used for hour numbering. Normally 3600; configurable for testing.
    #[serde(rename = "SECONDS_PER_HOUR", default = "default_seconds_per_hour")]
    pub seconds_per_hour: i64,
    /// The hour number given to the first hour of a calendar year. Normally 0 or 1.
    #[serde(default)]
    pub first_hour_number: i64,
}

impl Default for TimeParameters {
    fn default() -> Self {
        Self {
            seconds_per_hour: default_seconds_per_hour(),
            first_hour_number: 0,
        }
    }
}

/// The hour number of a timestamp: a count of hours elapsed since the start of the timestamp's
/// own calendar year, offset by `first_hour_number`. The count resets at each year boundary.
pub fn hour_number(time_stamp: NaiveDateTime, time: &TimeParameters) -> Result<i64> {
    ensure!(
        time.seconds_per_hour > 0,
        "time.SECONDS_PER_HOUR must be positive (got {})",
        time.seconds_per_hour
    );

    let year_start = NaiveDate::from_ymd_opt(time_stamp.year(), 1, 1)
        .context("Year out of range for hour numbering")?
        .and_time(NaiveTime::MIN);
    let seconds_into_year = (time_stamp - year_start).num_seconds();

    Ok(time.first_hour_number + seconds_into_year / time.seconds_per_hour)
}

/// The zero-padded spine label for an hour number (e.g. `t0007`).
pub fn spine_label(hour_number: i64) -> String {
    format!("t{hour_number:04}")
}

/// Generate the time grid of the run and the hour number of each grid timestamp.
///
/// The grid is evenly spaced at the run frequency over the half-open interval [start, end): the
/// start is included, the end is not, and no partial final step is emitted. An end at or before
/// the start yields an empty grid, not an error.
pub fn generate_time_range(
    run: &RunParameters,
    time: &TimeParameters,
) -> Result<(Vec<NaiveDateTime>, Vec<i64>)> {
    let start = run.start.to_time_stamp().context("Invalid run.start")?;
    let end = run.end.to_time_stamp().context("Invalid run.end")?;
    let step = run.frequency.step()?;

    let mut time_stamps = Vec::new();
    let mut current = start;
    while current < end {
        time_stamps.push(current);
        current += step;
    }

    let hour_numbers = time_stamps
        .iter()
        .map(|time_stamp| hour_number(*time_stamp, time))
        .collect::<Result<Vec<_>>>()?;

    Ok((time_stamps, hour_numbers))
}

/// A tabular scaffold with one row per grid timestamp.
///
/// Besides the hour number and spine label of each timestamp it carries one column per declared
/// location, all empty at construction; downstream consumers fill them in.
#[derive(Debug, PartialEq)]
pub struct TimeStampedTable {
    /// The grid timestamps, in order (the table index)
    pub time_stamps: Vec<NaiveDateTime>,
    /// The hour number of each grid timestamp
    pub hour_numbers: Vec<i64>,
    /// The spine label of each grid timestamp
    pub spine_hour_numbers: Vec<String>,
    /// One empty column per declared location
    pub location_values: IndexMap<LocationID, Vec<Option<f64>>>,
}

/// Build the timestamped table scaffold for the run.
pub fn build_timestamped_table(
    run: &RunParameters,
    time: &TimeParameters,
    locations: &LocationMap,
) -> Result<TimeStampedTable> {
    let (time_stamps, hour_numbers) = generate_time_range(run, time)?;
    let spine_hour_numbers = hour_numbers.iter().copied().map(spine_label).collect();
    let location_values = locations
        .keys()
        .map(|id| (id.clone(), vec![None; time_stamps.len()]))
        .collect();

    Ok(TimeStampedTable {
        time_stamps,
        hour_numbers,
        spine_hour_numbers,
        location_values,
    })
}
