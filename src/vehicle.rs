//! Vehicles are the types (or subtypes) of electric vehicle in the fleet.
use crate::id::define_id_type;
use crate::road_type::{RoadTypeID, check_covers_road_types};
use crate::units::{Dimensionless, KilowattHours, KilowattHoursPerKilometre, KilowattsPeak};
use anyhow::Result;
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use std::rc::Rc;

define_id_type! {VehicleID}

/// A map of [`Vehicle`]s, keyed by vehicle ID
pub type VehicleMap = IndexMap<VehicleID, Rc<Vehicle>>;

/// A vehicle type with its consumption characteristics.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    /// A unique identifier for the vehicle (e.g. "compact_car")
    pub id: VehicleID,
    /// Electricity consumption per unit distance, before correction factors
    pub base_consumption: KilowattHoursPerKilometre,
    /// The capacity of the vehicle's battery
    pub battery_capacity: KilowattHours,
    /// The size of the vehicle's solar panels.
    ///
    /// Loaded but not yet used in the electricity-use computation; reserved for solar-efficiency
    /// modelling.
    pub solar_panel_size_kwp: KilowattsPeak,
    /// Consumption multiplier per road type, covering the whole road-type registry
    pub road_factors: IndexMap<RoadTypeID, Dimensionless>,
}

/// A vehicle entry as read from the scenario file, before validation.
#[derive(Debug, Deserialize, PartialEq)]
pub struct VehicleRaw {
    /// Electricity consumption per unit distance, before correction factors
    pub base_consumption: KilowattHoursPerKilometre,
    /// The capacity of the vehicle's battery
    pub battery_capacity: KilowattHours,
    /// The size of the vehicle's solar panels
    #[serde(rename = "solar_panel_size_kWp")]
    pub solar_panel_size_kwp: KilowattsPeak,
    /// Consumption multiplier per road type
    pub road_factors: IndexMap<RoadTypeID, Dimensionless>,
}

/// Build the vehicle map from the raw scenario entries.
///
/// Every vehicle's `road_factors` must cover the road-type registry exactly; a missing or unknown
/// road type is a configuration error.
pub fn build_vehicles(
    raw: IndexMap<VehicleID, VehicleRaw>,
    road_types: &IndexSet<RoadTypeID>,
) -> Result<VehicleMap> {
    raw.into_iter()
        .map(|(id, vehicle)| {
            check_covers_road_types(
                &vehicle.road_factors,
                road_types,
                &format!("Vehicle {id}"),
            )?;

            let vehicle = Vehicle {
                id: id.clone(),
                base_consumption: vehicle.base_consumption,
                battery_capacity: vehicle.battery_capacity,
                solar_panel_size_kwp: vehicle.solar_panel_size_kwp,
                road_factors: vehicle.road_factors,
            };
            Ok((id, vehicle.into()))
        })
        .collect()
}
