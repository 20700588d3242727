//! Unified weather report served to the dashboard
//!
//! Field names follow the shape the existing frontend consumes, which is
//! modelled on the OpenWeatherMap current-weather payload.

use super::{AirQuality, DailyPoint, HourlyPoint, WeatherCondition};
use serde::Serialize;

/// Visibility is not provided by the forecast service; the dashboard expects a value
pub const DEFAULT_VISIBILITY_METERS: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub coord: Coordinates,
    pub weather: Vec<ConditionSummary>,
    pub main: MainReadings,
    pub visibility: u32,
    pub wind: Wind,
    pub sys: SystemInfo,
    pub name: String,
    pub location: LocationSummary,
    pub hourly_forecast: Vec<HourlyPoint>,
    pub daily_forecast: Vec<DailyPoint>,
    pub aqi: Option<AirQuality>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

/// Current condition with its WMO code as `id`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionSummary {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub condition: WeatherCondition,
}

/// Current readings; temperatures in °C to one decimal, `null` when not reported
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainReadings {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    /// Surface pressure in hPa
    pub pressure: Option<i64>,
    pub humidity: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wind {
    /// km/h, one decimal
    pub speed: Option<f64>,
    /// Direction in degrees
    pub deg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemInfo {
    pub country: String,
    /// Unix seconds
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSummary {
    pub full_name: String,
    pub country: String,
    pub country_code: String,
    pub admin1: Option<String>,
    pub admin2: Option<String>,
    pub timezone: Option<String>,
}
