//! Legs are point-to-point vehicle movements, i.e. movements where the vehicle goes from a start
//! location and ends/stops at an end location.
use crate::id::define_id_type;
use crate::location::{Location, LocationMap};
use crate::road_type::{RoadTypeID, check_covers_road_types};
use crate::units::{Dimensionless, Hours, KilowattHours, Kilometres};
use crate::vehicle::Vehicle;
use crate::weather::{TEMPERATURE_QUANTITY_NAME, WeatherSource};
use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDateTime, Timelike};
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use std::rc::Rc;

define_id_type! {LegID}

/// A map of [`Leg`]s, keyed by leg ID
pub type LegMap = IndexMap<LegID, Rc<Leg>>;

/// A single point-to-point trip between two locations.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    /// A unique identifier for the leg (e.g. "commute")
    pub id: LegID,
    /// The distance covered by the leg
    pub distance: Kilometres,
    /// The time the leg takes
    pub duration: Hours,
    /// A consumption multiplier per clock hour of the day, indexed 0-23.
    ///
    /// The index is the display hour (midnight to midnight), not the hour in the trip's own day.
    pub hour_in_day_factors: [Dimensionless; 24],
    /// Where the leg starts (shared with other legs)
    pub start_location: Rc<Location>,
    /// Where the leg ends (shared with other legs)
    pub end_location: Rc<Location>,
    /// Fraction of the leg per road type, covering the whole road-type registry
    pub road_type_mix: IndexMap<RoadTypeID, Dimensionless>,
}

impl Leg {
    /// How much electricity the leg uses when driven by `vehicle` at `time_stamp`.
    ///
    /// The result combines the distance and the vehicle's base consumption with correction
    /// factors for the temperature, the mix of road types and the time of day:
    ///
    /// 1. The weighted road factor sums `road_type_mix[r] * vehicle.road_factors[r]` over every
    ///    registered road type. A missing entry in either mapping is an error, never a zero
    ///    contribution.
    /// 2. The hour-in-day factor is selected by the timestamp's wall-clock hour.
    /// 3. The temperature factor is the mean of the weather quantity at the start and the end
    ///    location. It is applied as an opaque multiplier, with no conversion or clamping.
    ///
    /// All terms are simple products, so a negative factor passes through to the result.
    ///
    /// This is a pure function: it mutates nothing and identical inputs give identical results.
    pub fn electricity_use_kwh(
        &self,
        time_stamp: NaiveDateTime,
        vehicle: &Vehicle,
        road_types: &IndexSet<RoadTypeID>,
        weather: &dyn WeatherSource,
    ) -> Result<KilowattHours> {
        let mut weighted_road_factor = Dimensionless(0.0);
        for road_type in road_types {
            let mix_share = *self.road_type_mix.get(road_type).with_context(|| {
                format!(
                    "Leg {} has no road_type_mix entry for road type {road_type}",
                    self.id
                )
            })?;
            let road_factor = *vehicle.road_factors.get(road_type).with_context(|| {
                format!(
                    "Vehicle {} has no road_factors entry for road type {road_type}",
                    vehicle.id
                )
            })?;
            weighted_road_factor = weighted_road_factor + mix_share * road_factor;
        }

        let hour_in_day_factor = self.hour_in_day_factors[time_stamp.hour() as usize];

        // The temperature factor is the average of the factor at the start and end locations.
        let temperature_factor_start_location = weather.get_location_weather_quantity(
            self.start_location.latitude,
            self.start_location.longitude,
            time_stamp,
            TEMPERATURE_QUANTITY_NAME,
        )?;
        let temperature_factor_end_location = weather.get_location_weather_quantity(
            self.end_location.latitude,
            self.end_location.longitude,
            time_stamp,
            TEMPERATURE_QUANTITY_NAME,
        )?;
        let temperature_factor_leg = (temperature_factor_start_location
            + temperature_factor_end_location)
            / Dimensionless(2.0);

        Ok(self.distance
            * vehicle.base_consumption
            * temperature_factor_leg
            * weighted_road_factor
            * hour_in_day_factor)
    }
}

/// The "locations" table of a leg entry, naming the start and end locations.
#[derive(Debug, Deserialize, PartialEq)]
pub struct LegEndpointsRaw {
    /// Name of the location where the leg starts
    pub start: String,
    /// Name of the location where the leg ends
    pub end: String,
}

/// A leg entry as read from the scenario file, before validation.
#[derive(Debug, Deserialize, PartialEq)]
pub struct LegRaw {
    /// The distance covered by the leg
    pub distance: Kilometres,
    /// The time the leg takes
    pub duration: Hours,
    /// A consumption multiplier per clock hour of the day; must have exactly 24 entries
    pub hour_in_day_factors: Vec<Dimensionless>,
    /// The names of the start and end locations
    pub locations: LegEndpointsRaw,
    /// Fraction of the leg per road type
    pub road_type_mix: IndexMap<RoadTypeID, Dimensionless>,
}

/// Build the leg map from the raw scenario entries.
///
/// Start and end location names must resolve to declared locations and every leg's
/// `road_type_mix` must cover the road-type registry exactly.
pub fn build_legs(
    raw: IndexMap<LegID, LegRaw>,
    locations: &LocationMap,
    road_types: &IndexSet<RoadTypeID>,
) -> Result<LegMap> {
    raw.into_iter()
        .map(|(id, leg)| {
            let hour_in_day_factors: [Dimensionless; 24] =
                leg.hour_in_day_factors.try_into().map_err(|v: Vec<_>| {
                    anyhow!(
                        "Leg {id} must have exactly 24 hour_in_day_factors (got {})",
                        v.len()
                    )
                })?;
            let start_location = locations
                .get(leg.locations.start.as_str())
                .with_context(|| {
                    format!("Leg {id} starts at unknown location {}", leg.locations.start)
                })?
                .clone();
            let end_location = locations
                .get(leg.locations.end.as_str())
                .with_context(|| {
                    format!("Leg {id} ends at unknown location {}", leg.locations.end)
                })?
                .clone();
            check_covers_road_types(&leg.road_type_mix, road_types, &format!("Leg {id}"))?;

            let leg = Leg {
                id: id.clone(),
                distance: leg.distance,
                duration: leg.duration,
                hour_in_day_factors,
                start_location,
                end_location,
                road_type_mix: leg.road_type_mix,
            };
            Ok((id, leg.into()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{leg, locations, road_types, time_stamp, vehicle};
    use crate::weather::ConstantWeather;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_electricity_use_identity_factors(
        leg: Leg,
        vehicle: Vehicle,
        road_types: IndexSet<RoadTypeID>,
        time_stamp: NaiveDateTime,
    ) {
        // All correction factors are 1 except the 1.1 highway road factor
        let weather = ConstantWeather::new(Dimensionless(1.0));
        let result = leg
            .electricity_use_kwh(time_stamp, &vehicle, &road_types, &weather)
            .unwrap();
        assert_approx_eq!(f64, result.value(), 22.0);
    }

    #[rstest]
    fn test_electricity_use_is_deterministic(
        leg: Leg,
        vehicle: Vehicle,
        road_types: IndexSet<RoadTypeID>,
        time_stamp: NaiveDateTime,
    ) {
        let weather = ConstantWeather::new(Dimensionless(0.85));
        let first = leg
            .electricity_use_kwh(time_stamp, &vehicle, &road_types, &weather)
            .unwrap();
        let second = leg
            .electricity_use_kwh(time_stamp, &vehicle, &road_types, &weather)
            .unwrap();
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_electricity_use_linear_in_distance(
        leg: Leg,
        vehicle: Vehicle,
        road_types: IndexSet<RoadTypeID>,
        time_stamp: NaiveDateTime,
    ) {
        let weather = ConstantWeather::new(Dimensionless(1.0));
        let single = leg
            .electricity_use_kwh(time_stamp, &vehicle, &road_types, &weather)
            .unwrap();

        let mut doubled = leg.clone();
        doubled.distance = Kilometres(leg.distance.value() * 2.0);
        let double = doubled
            .electricity_use_kwh(time_stamp, &vehicle, &road_types, &weather)
            .unwrap();
        assert_approx_eq!(f64, double.value(), 2.0 * single.value());
    }

    #[rstest]
    fn test_electricity_use_linear_in_base_consumption(
        leg: Leg,
        vehicle: Vehicle,
        road_types: IndexSet<RoadTypeID>,
        time_stamp: NaiveDateTime,
    ) {
        let weather = ConstantWeather::new(Dimensionless(1.0));
        let single = leg
            .electricity_use_kwh(time_stamp, &vehicle, &road_types, &weather)
            .unwrap();

        let mut doubled = vehicle.clone();
        doubled.base_consumption =
            crate::units::KilowattHoursPerKilometre(vehicle.base_consumption.value() * 2.0);
        let double = leg
            .electricity_use_kwh(time_stamp, &doubled, &road_types, &weather)
            .unwrap();
        assert_approx_eq!(f64, double.value(), 2.0 * single.value());
    }

    #[rstest]
    fn test_electricity_use_hour_factor_uses_clock_hour(
        mut leg: Leg,
        vehicle: Vehicle,
        road_types: IndexSet<RoadTypeID>,
        time_stamp: NaiveDateTime,
    ) {
        leg.hour_in_day_factors[time_stamp.hour() as usize] = Dimensionless(2.0);
        let weather = ConstantWeather::new(Dimensionless(1.0));
        let result = leg
            .electricity_use_kwh(time_stamp, &vehicle, &road_types, &weather)
            .unwrap();
        assert_approx_eq!(f64, result.value(), 44.0);
    }

    #[rstest]
    fn test_electricity_use_negative_factor_passes_through(
        leg: Leg,
        vehicle: Vehicle,
        road_types: IndexSet<RoadTypeID>,
        time_stamp: NaiveDateTime,
    ) {
        // Sign conventions belong to the weather collaborator; no clamping here
        let weather = ConstantWeather::new(Dimensionless(-1.0));
        let result = leg
            .electricity_use_kwh(time_stamp, &vehicle, &road_types, &weather)
            .unwrap();
        assert_approx_eq!(f64, result.value(), -22.0);
    }

    /// A weather stub serving the given factors in query order
    struct SequenceWeather {
        factors: std::cell::RefCell<Vec<Dimensionless>>,
    }

    impl WeatherSource for SequenceWeather {
        fn get_location_weather_quantity(
            &self,
            _latitude: f64,
            _longitude: f64,
            _time_stamp: NaiveDateTime,
            _quantity_name: &str,
        ) -> anyhow::Result<Dimensionless> {
            Ok(self.factors.borrow_mut().remove(0))
        }
    }

    #[rstest]
    fn test_electricity_use_averages_endpoint_temperatures(
        leg: Leg,
        vehicle: Vehicle,
        road_types: IndexSet<RoadTypeID>,
        time_stamp: NaiveDateTime,
    ) {
        // The start location is queried first, then the end location
        let weather = SequenceWeather {
            factors: std::cell::RefCell::new(vec![Dimensionless(0.5), Dimensionless(1.5)]),
        };
        let result = leg
            .electricity_use_kwh(time_stamp, &vehicle, &road_types, &weather)
            .unwrap();
        // Temperature factor is the mean of 0.5 and 1.5
        assert_approx_eq!(f64, result.value(), 22.0);
    }

    /// A weather stub recording the coordinates of each query
    struct RecordingWeather {
        queries: std::cell::RefCell<Vec<(f64, f64)>>,
    }

    impl WeatherSource for RecordingWeather {
        fn get_location_weather_quantity(
            &self,
            latitude: f64,
            longitude: f64,
            _time_stamp: NaiveDateTime,
            _quantity_name: &str,
        ) -> anyhow::Result<Dimensionless> {
            self.queries.borrow_mut().push((latitude, longitude));
            Ok(Dimensionless(1.0))
        }
    }

    #[rstest]
    fn test_electricity_use_queries_weather_at_both_endpoints(
        leg: Leg,
        vehicle: Vehicle,
        road_types: IndexSet<RoadTypeID>,
        time_stamp: NaiveDateTime,
    ) {
        let weather = RecordingWeather {
            queries: std::cell::RefCell::new(Vec::new()),
        };
        leg.electricity_use_kwh(time_stamp, &vehicle, &road_types, &weather)
            .unwrap();
        let queries = weather.queries.into_inner();
        assert_eq!(
            queries,
            vec![
                (leg.start_location.latitude, leg.start_location.longitude),
                (leg.end_location.latitude, leg.end_location.longitude),
            ]
        );
    }

    /// A weather stub that fails every query
    struct FailingWeather;

    impl WeatherSource for FailingWeather {
        fn get_location_weather_quantity(
            &self,
            _latitude: f64,
            _longitude: f64,
            _time_stamp: NaiveDateTime,
            _quantity_name: &str,
        ) -> anyhow::Result<Dimensionless> {
            anyhow::bail!("No temperature data for this point")
        }
    }

    #[rstest]
    fn test_electricity_use_propagates_weather_error(
        leg: Leg,
        vehicle: Vehicle,
        road_types: IndexSet<RoadTypeID>,
        time_stamp: NaiveDateTime,
    ) {
        // A failing lookup surfaces unchanged; no default value is substituted
        let error = leg
            .electricity_use_kwh(time_stamp, &vehicle, &road_types, &FailingWeather)
            .unwrap_err();
        assert_eq!(error.to_string(), "No temperature data for this point");
    }

    #[rstest]
    fn test_electricity_use_missing_vehicle_road_factor(
        leg: Leg,
        mut vehicle: Vehicle,
        road_types: IndexSet<RoadTypeID>,
        time_stamp: NaiveDateTime,
    ) {
        vehicle.road_factors.shift_remove(&RoadTypeID::new("highway"));
        let weather = ConstantWeather::new(Dimensionless(1.0));
        let error = leg
            .electricity_use_kwh(time_stamp, &vehicle, &road_types, &weather)
            .unwrap_err();
        assert!(error.to_string().contains("road_factors entry"));
    }

    #[rstest]
    fn test_build_legs(locations: LocationMap, road_types: IndexSet<RoadTypeID>) {
        let raw = LegRaw {
            distance: Kilometres(100.0),
            duration: Hours(0.5),
            hour_in_day_factors: vec![Dimensionless(1.0); 24],
            locations: LegEndpointsRaw {
                start: "home".to_string(),
                end: "work".to_string(),
            },
            road_type_mix: [("highway".into(), Dimensionless(1.0))].into_iter().collect(),
        };
        let legs = build_legs([("commute".into(), raw)].into_iter().collect(), &locations, &road_types);
        let legs = legs.unwrap();
        assert_eq!(legs["commute"].start_location.id, "home".into());
        assert_eq!(legs["commute"].end_location.id, "work".into());
    }

    #[rstest]
    fn test_build_legs_wrong_factor_count(
        locations: LocationMap,
        road_types: IndexSet<RoadTypeID>,
    ) {
        let raw = LegRaw {
            distance: Kilometres(100.0),
            duration: Hours(0.5),
            hour_in_day_factors: vec![Dimensionless(1.0); 23],
            locations: LegEndpointsRaw {
                start: "home".to_string(),
                end: "work".to_string(),
            },
            road_type_mix: [("highway".into(), Dimensionless(1.0))].into_iter().collect(),
        };
        let error = build_legs(
            [("commute".into(), raw)].into_iter().collect(),
            &locations,
            &road_types,
        )
        .unwrap_err();
        assert!(error.to_string().contains("exactly 24"));
    }

    #[rstest]
    fn test_build_legs_unknown_location(
        locations: LocationMap,
        road_types: IndexSet<RoadTypeID>,
    ) {
        let raw = LegRaw {
            distance: Kilometres(100.0),
            duration: Hours(0.5),
            hour_in_day_factors: vec![Dimensionless(1.0); 24],
            locations: LegEndpointsRaw {
                start: "home".to_string(),
                end: "beach".to_string(),
            },
            road_type_mix: [("highway".into(), Dimensionless(1.0))].into_iter().collect(),
        };
        let error = build_legs(
            [("commute".into(), raw)].into_iter().collect(),
            &locations,
            &road_types,
        )
        .unwrap_err();
        assert!(error.to_string().contains("unknown location beach"));
    }
}
