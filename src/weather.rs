//! The seam to the weather subsystem.
//!
//! The electricity-use model only needs a single quantity per (point, time) query and treats the
//! returned value as an opaque multiplier. The real weather service lives outside this crate;
//! anything that can answer the query implements [`WeatherSource`].
use crate::units::Dimensionless;
use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Deserialize;

/// The name of the weather quantity requested by the electricity-use model
pub const TEMPERATURE_QUANTITY_NAME: &str = "Temperature at 2 meters (°C)";

/// A supplier of weather quantities for a given point and time.
///
/// Implementations may answer from cached or interpolated data. A failed lookup must be returned
/// as an error, never substituted with a default value.
pub trait WeatherSource {
    /// Get the value of the named weather quantity at the given coordinates and time.
    fn get_location_weather_quantity(
        &self,
        latitude: f64,
        longitude: f64,
        time_stamp: NaiveDateTime,
        quantity_name: &str,
    ) -> Result<Dimensionless>;
}

/// Represents the "weather" section of the scenario file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct WeatherParameters {
    /// The fixed factor served by [`ConstantWeather`]
    #[serde(default = "default_constant_temperature_factor")]
    pub constant_temperature_factor: Dimensionless,
}

impl Default for WeatherParameters {
    fn default() -> Self {
        Self {
            constant_temperature_factor: default_constant_temperature_factor(),
        }
    }
}

/// Default temperature factor for the stand-in source
fn default_constant_temperature_factor() -> Dimensionless {
    Dimensionless(1.0)
}

/// A stand-in weather source serving the same factor everywhere.
///
/// Used by the command line interface until a real weather service is wired in, and by tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantWeather {
    factor: Dimensionless,
}

impl ConstantWeather {
    /// Create a source serving the given factor
    pub fn new(factor: Dimensionless) -> Self {
        Self { factor }
    }

    /// Create a source from the scenario file's weather section
    pub fn from_parameters(parameters: &WeatherParameters) -> Self {
        Self::new(parameters.constant_temperature_factor)
    }
}

impl WeatherSource for ConstantWeather {
    fn get_location_weather_quantity(
        &self,
        _latitude: f64,
        _longitude: f64,
        _time_stamp: NaiveDateTime,
        _quantity_name: &str,
    ) -> Result<Dimensionless> {
        Ok(self.factor)
    }
}
