//! Test fixtures shared between modules.
#![allow(missing_docs)]
use crate::leg::{Leg, LegID};
use crate::location::{Location, LocationID, LocationMap};
use crate::road_type::RoadTypeID;
use crate::units::{
    Dimensionless, Hours, KilowattHours, KilowattHoursPerKilometre, Kilowatts, KilowattsPeak,
    Kilometres,
};
use crate::vehicle::{Vehicle, VehicleID};
use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexSet;
use rstest::fixture;
use std::rc::Rc;

#[fixture]
pub fn road_types() -> IndexSet<RoadTypeID> {
    ["highway".into()].into_iter().collect()
}

#[fixture]
pub fn locations() -> LocationMap {
    [
        (
            LocationID::new("home"),
            Rc::new(Location {
                id: "home".into(),
                connectivity: Dimensionless(1.0),
                charging_power: Kilowatts(11.0),
                latitude: 52.0,
                longitude: 4.3,
            }),
        ),
        (
            LocationID::new("work"),
            Rc::new(Location {
                id: "work".into(),
                connectivity: Dimensionless(0.5),
                charging_power: Kilowatts(22.0),
                latitude: 52.1,
                longitude: 4.4,
            }),
        ),
    ]
    .into_iter()
    .collect()
}

#[fixture]
pub fn vehicle() -> Vehicle {
    Vehicle {
        id: VehicleID::new("car"),
        base_consumption: KilowattHoursPerKilometre(0.2),
        battery_capacity: KilowattHours(60.0),
        solar_panel_size_kwp: KilowattsPeak(0.5),
        road_factors: [("highway".into(), Dimensionless(1.1))].into_iter().collect(),
    }
}

#[fixture]
pub fn leg(locations: LocationMap) -> Leg {
    Leg {
        id: LegID::new("commute"),
        distance: Kilometres(100.0),
        duration: Hours(0.5),
        hour_in_day_factors: [Dimensionless(1.0); 24],
        start_location: Rc::clone(&locations["home"]),
        end_location: Rc::clone(&locations["work"]),
        road_type_mix: [("highway".into(), Dimensionless(1.0))].into_iter().collect(),
    }
}

#[fixture]
pub fn time_stamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 1, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

/// A minimal scenario file with one leg, one vehicle and two locations
pub fn scenario_toml() -> &'static str {
    r#"
[run.start]
year = 2023
month = 1
day = 1
hour = 0
minute = 0

[run.end]
year = 2023
month = 1
day = 1
hour = 2
minute = 0

[run.frequency]
size = 1
type = "hours"

[time]
SECONDS_PER_HOUR = 3600
first_hour_number = 1

[transport_factors]
road_types = ["highway"]

[legs.commute]
distance = 100.0
duration = 0.5
hour_in_day_factors = [
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
]
locations = { start = "home", end = "work" }

[legs.commute.road_type_mix]
highway = 1.0

[vehicles.car]
base_consumption = 0.2
battery_capacity = 60.0
solar_panel_size_kWp = 0.5

[vehicles.car.road_factors]
highway = 1.1

[locations.home]
connectivity = 1.0
charging_power = 11.0
latitude = 52.0
longitude = 4.3

[locations.work]
connectivity = 0.5
charging_power = 22.0
latitude = 52.1
longitude = 4.4
"#
}
