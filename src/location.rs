//! Locations are the places where legs start and end (e.g. home, work).
//!
//! Each location carries charger information and the coordinates used for weather lookups.
use crate::id::define_id_type;
use crate::input::deserialise_proportion;
use crate::units::{Dimensionless, Kilowatts};
use anyhow::{Result, ensure};
use indexmap::IndexMap;
use serde::Deserialize;
use std::rc::Rc;

define_id_type! {LocationID}

/// A map of [`Location`]s, keyed by location ID.
///
/// Locations are shared: a location may be the endpoint of many legs, so the map stores
/// [`Rc`]-wrapped values which legs hold non-owning clones of.
pub type LocationMap = IndexMap<LocationID, Rc<Location>>;

/// A place where vehicles can be, with its charger and coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// A unique identifier for the location (e.g. "home")
    pub id: LocationID,
    /// Charger presence at the location, as a proportion between 0 and 1
    pub connectivity: Dimensionless,
    /// The power of the chargers at the location
    pub charging_power: Kilowatts,
    /// Latitude in degrees, used for weather lookups
    pub latitude: f64,
    /// Longitude in degrees, used for weather lookups
    pub longitude: f64,
}

/// A location entry as read from the scenario file, before validation.
#[derive(Debug, Deserialize, PartialEq)]
pub struct LocationRaw {
    /// Charger presence at the location, as a proportion between 0 and 1
    #[serde(deserialize_with = "deserialise_proportion")]
    pub connectivity: Dimensionless,
    /// The power of the chargers at the location
    pub charging_power: Kilowatts,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

/// Build the location map from the raw scenario entries.
///
/// Coordinates must describe a valid point so that weather lookups can succeed.
pub fn build_locations(raw: IndexMap<LocationID, LocationRaw>) -> Result<LocationMap> {
    raw.into_iter()
        .map(|(id, location)| {
            ensure!(
                (-90.0..=90.0).contains(&location.latitude),
                "Location {id} has latitude {} outside [-90, 90]",
                location.latitude
            );
            ensure!(
                (-180.0..=180.0).contains(&location.longitude),
                "Location {id} has longitude {} outside [-180, 180]",
                location.longitude
            );

            let location = Location {
                id: id.clone(),
                connectivity: location.connectivity,
                charging_power: location.charging_power,
                latitude: location.latitude,
                longitude: location.longitude,
            };
            Ok((id, location.into()))
        })
        .collect()
}
