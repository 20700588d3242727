//! Normalization of Open-Meteo payloads into the dashboard's report shapes

use super::open_meteo::{AirQualityCurrent, DailyData, ForecastResponse, HourlyData, sample};
use crate::error::UpstreamError;
use crate::models::weather::{
    ConditionSummary, Coordinates, DEFAULT_VISIBILITY_METERS, LocationSummary, MainReadings,
    SystemInfo, Wind,
};
use crate::models::{
    AirQuality, AqiDescription, AqiLevel, DailyPoint, ForecastEntry, ForecastSummary,
    HourlyPoint, Location, TemperatureRange, WeatherCondition, WeatherReport, round_half_up,
    round_to_tenth,
};
use chrono::{NaiveDate, NaiveDateTime};

pub const HOURLY_POINTS: usize = 24;
pub const DAILY_POINTS: usize = 7;

/// Assemble the unified report for `location` from a forecast and optional AQI reading
pub fn build_report(
    location: &Location,
    forecast: &ForecastResponse,
    aqi: Option<AirQuality>,
) -> Result<WeatherReport, UpstreamError> {
    let current = forecast.current.as_ref().ok_or_else(|| UpstreamError::Decode {
        service: "forecast",
        message: "response has no current block".to_string(),
    })?;

    let condition = WeatherCondition::from_optional(current.weather_code);
    let daily = forecast.daily.as_ref();
    let offset = forecast.utc_offset_seconds;
    let temp_min = daily.and_then(|d| sample(&d.temperature_2m_min, 0));
    let temp_max = daily.and_then(|d| sample(&d.temperature_2m_max, 0));
    let sunrise = daily
        .and_then(|d| sample(&d.sunrise, 0))
        .and_then(|t| local_time_to_unix(&t, offset));
    let sunset = daily
        .and_then(|d| sample(&d.sunset, 0))
        .and_then(|t| local_time_to_unix(&t, offset));

    Ok(WeatherReport {
        coord: Coordinates {
            lon: location.longitude,
            lat: location.latitude,
        },
        weather: vec![ConditionSummary {
            id: current.weather_code,
            condition,
        }],
        main: MainReadings {
            temp: current.temperature_2m.map(round_to_tenth),
            feels_like: current.apparent_temperature.map(round_to_tenth),
            temp_min: temp_min.map(round_to_tenth),
            temp_max: temp_max.map(round_to_tenth),
            pressure: current.surface_pressure.map(round_half_up),
            humidity: current.relative_humidity_2m.map(round_half_up),
        },
        visibility: DEFAULT_VISIBILITY_METERS,
        wind: Wind {
            speed: current.wind_speed_10m.map(round_to_tenth),
            deg: current.wind_direction_10m,
        },
        sys: SystemInfo {
            country: location.country_code.clone(),
            sunrise,
            sunset,
        },
        name: location.name.clone(),
        location: LocationSummary {
            full_name: location.full_name(),
            country: location.country.clone(),
            country_code: location.country_code.clone(),
            admin1: location.admin1.clone(),
            admin2: location.admin2.clone(),
            timezone: location.timezone.clone().or_else(|| forecast.timezone.clone()),
        },
        hourly_forecast: forecast.hourly.as_ref().map(hourly_points).unwrap_or_default(),
        daily_forecast: daily.map(daily_points).unwrap_or_default(),
        aqi,
    })
}

/// First 24 hours; shorter series are not padded
pub fn hourly_points(hourly: &HourlyData) -> Vec<HourlyPoint> {
    hourly
        .time
        .iter()
        .take(HOURLY_POINTS)
        .enumerate()
        .map(|(i, time)| {
            let weather_code = sample(&hourly.weather_code, i);
            HourlyPoint {
                time: time.clone(),
                temperature: sample(&hourly.temperature_2m, i).map(round_half_up),
                weather_code,
                condition: WeatherCondition::from_optional(weather_code),
                humidity: sample(&hourly.relative_humidity_2m, i),
                wind_speed: sample(&hourly.wind_speed_10m, i),
            }
        })
        .collect()
}

/// First 7 days; shorter series are not padded
pub fn daily_points(daily: &DailyData) -> Vec<DailyPoint> {
    daily
        .time
        .iter()
        .take(DAILY_POINTS)
        .enumerate()
        .map(|(i, date)| {
            let weather_code = sample(&daily.weather_code, i);
            DailyPoint {
                date: date.clone(),
                temp_max: sample(&daily.temperature_2m_max, i).map(round_half_up),
                temp_min: sample(&daily.temperature_2m_min, i).map(round_half_up),
                weather_code,
                condition: WeatherCondition::from_optional(weather_code),
                sunrise: sample(&daily.sunrise, i),
                sunset: sample(&daily.sunset, i),
            }
        })
        .collect()
}

/// Simplified daily list for the forecast endpoint
pub fn build_summary(forecast: &ForecastResponse) -> ForecastSummary {
    let list = forecast
        .daily
        .as_ref()
        .map(|daily| {
            daily
                .time
                .iter()
                .enumerate()
                .map(|(i, date)| ForecastEntry {
                    dt: date_to_unix(date),
                    main: TemperatureRange {
                        temp_max: sample(&daily.temperature_2m_max, i),
                        temp_min: sample(&daily.temperature_2m_min, i),
                    },
                    weather: vec![WeatherCondition::from_optional(sample(
                        &daily.weather_code,
                        i,
                    ))],
                })
                .collect()
        })
        .unwrap_or_default();

    ForecastSummary { list }
}

impl From<AirQualityCurrent> for AirQuality {
    fn from(current: AirQualityCurrent) -> Self {
        let us_aqi = current.us_aqi.map(round_half_up);
        Self {
            us_aqi,
            pm10: current.pm10,
            pm2_5: current.pm2_5,
            co: current.carbon_monoxide,
            no2: current.nitrogen_dioxide,
            so2: current.sulphur_dioxide,
            o3: current.ozone,
            description: us_aqi.map(|aqi| AqiDescription::from(AqiLevel::classify(aqi))),
        }
    }
}

/// Open-Meteo local time (`2024-05-01T05:12`) to Unix seconds
fn local_time_to_unix(local: &str, utc_offset_seconds: i64) -> Option<i64> {
    NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|dt| dt.and_utc().timestamp() - utc_offset_seconds)
}

/// Calendar date at UTC midnight as Unix seconds
fn date_to_unix(date: &str) -> Option<i64> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}
