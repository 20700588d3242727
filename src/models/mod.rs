//! Data models for the weather dashboard
//!
//! - Location: coordinates and place metadata
//! - Condition: WMO code lookup
//! - Air quality: AQI readings and bands
//! - Forecast / Weather: the normalized shapes served to the frontend
//! - City: autocomplete suggestions

pub mod air_quality;
pub mod city;
pub mod condition;
pub mod forecast;
pub mod location;
pub mod weather;

pub use air_quality::{AirQuality, AqiDescription, AqiLevel};
pub use city::CitySuggestion;
pub use condition::{ConditionCategory, WeatherCondition};
pub use forecast::{DailyPoint, ForecastEntry, ForecastSummary, HourlyPoint, TemperatureRange};
pub use location::Location;
pub use weather::WeatherReport;

/// Round to the nearest integer, halves toward positive infinity
#[must_use]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Round to one decimal place, halves toward positive infinity
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}
