//! Code for loading scenario files into a validated model.
use crate::input::{input_err_msg, read_toml};
use crate::leg::{LegID, LegMap, LegRaw, build_legs};
use crate::location::{LocationID, LocationMap, LocationRaw, build_locations};
use crate::road_type::{RoadTypeID, TransportFactorsRaw, read_road_types};
use crate::time_range::{RunParameters, TimeParameters};
use crate::vehicle::{VehicleID, VehicleMap, VehicleRaw, build_vehicles};
use crate::weather::WeatherParameters;
use anyhow::{Context, Result, ensure};
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use std::path::Path;

/// Represents the contents of an entire scenario file.
#[derive(Debug, Deserialize, PartialEq)]
struct ScenarioFile {
    /// Run boundaries and frequency
    run: RunParameters,
    /// Hour-numbering parameters
    #[serde(default)]
    time: TimeParameters,
    /// The road-type registry
    transport_factors: TransportFactorsRaw,
    /// Parameters for the stand-in weather source
    #[serde(default)]
    weather: WeatherParameters,
    /// Leg entries, keyed by name
    legs: IndexMap<LegID, LegRaw>,
    /// Vehicle entries, keyed by name
    vehicles: IndexMap<VehicleID, VehicleRaw>,
    /// Location entries, keyed by name
    locations: IndexMap<LocationID, LocationRaw>,
}

/// A validated, immutable scenario model.
///
/// All cross-references (leg endpoints, road-type mappings) are resolved and checked when the
/// model is loaded, so a constructed `Model` is internally consistent.
#[derive(Debug, PartialEq)]
pub struct Model {
    /// Run boundaries and frequency
    pub run: RunParameters,
    /// Hour-numbering parameters
    pub time: TimeParameters,
    /// Parameters for the stand-in weather source
    pub weather: WeatherParameters,
    /// The road-type registry
    pub road_types: IndexSet<RoadTypeID>,
    /// The legs of the scenario
    pub legs: LegMap,
    /// The vehicles of the scenario
    pub vehicles: VehicleMap,
    /// The locations of the scenario
    pub locations: LocationMap,
}

impl Model {
    /// Read a model from the specified scenario file.
    ///
    /// # Arguments
    ///
    /// * `scenario_file_path` - Path to the scenario TOML file
    pub fn from_path<P: AsRef<Path>>(scenario_file_path: P) -> Result<Model> {
        let file: ScenarioFile = read_toml(scenario_file_path.as_ref())?;
        Self::from_scenario(file).with_context(|| input_err_msg(scenario_file_path))
    }

    /// Build and validate a model from raw scenario file contents
    fn from_scenario(file: ScenarioFile) -> Result<Model> {
        ensure!(
            file.time.seconds_per_hour > 0,
            "time.SECONDS_PER_HOUR must be positive (got {})",
            file.time.seconds_per_hour
        );

        let road_types = read_road_types(file.transport_factors)?;
        let locations = build_locations(file.locations)?;
        let legs = build_legs(file.legs, &locations, &road_types)?;
        let vehicles = build_vehicles(file.vehicles, &road_types)?;

        Ok(Model {
            run: file.run,
            time: file.time,
            weather: file.weather,
            road_types,
            legs,
            vehicles,
            locations,
        })
    }
}
