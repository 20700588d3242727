//! Forecast series models

use super::WeatherCondition;
use serde::Serialize;

/// One hour of the 24-hour outlook
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPoint {
    /// Local time as reported upstream, e.g. `2024-05-01T13:00`
    pub time: String,
    /// Temperature in °C, rounded to an integer
    pub temperature: Option<i64>,
    pub weather_code: Option<i64>,
    pub condition: WeatherCondition,
    /// Relative humidity in percent
    pub humidity: Option<f64>,
    /// Wind speed in km/h
    pub wind_speed: Option<f64>,
}

/// One day of the 7-day outlook
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    /// Local date, e.g. `2024-05-01`
    pub date: String,
    pub temp_max: Option<i64>,
    pub temp_min: Option<i64>,
    pub weather_code: Option<i64>,
    pub condition: WeatherCondition,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}

/// Simplified multi-day forecast served by the forecast endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    pub list: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastEntry {
    /// Start of the day (UTC midnight) as Unix seconds
    pub dt: Option<i64>,
    pub main: TemperatureRange,
    pub weather: Vec<WeatherCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureRange {
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
}
