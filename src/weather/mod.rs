//! Weather aggregation over the Open-Meteo forecast and air-quality APIs

use crate::config::UpstreamConfig;
use crate::models::{AirQuality, ForecastSummary, Location, WeatherReport};
use crate::upstream::UpstreamClient;
use crate::{DashboardError, Result};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

pub mod open_meteo;
pub mod report;

use open_meteo::{AirQualityResponse, ForecastResponse};

const FORECAST_DAYS: u8 = 7;
const SUMMARY_DAYS: u8 = 5;

pub const WEATHER_FAILURE_MESSAGE: &str = "Failed to fetch weather data";
pub const FORECAST_FAILURE_MESSAGE: &str = "Failed to fetch forecast data";

/// Forecast plus the optional air-quality reading for the same coordinates
#[derive(Debug)]
pub struct Conditions {
    pub forecast: ForecastResponse,
    pub air_quality: Option<AirQuality>,
}

impl Conditions {
    /// Timezone the forecast service resolved for these coordinates
    #[must_use]
    pub fn timezone(&self) -> Option<&str> {
        self.forecast.timezone.as_deref()
    }

    /// Normalize into the report served for `location`
    pub fn into_report(self, location: &Location) -> Result<WeatherReport> {
        report::build_report(location, &self.forecast, self.air_quality).map_err(|e| {
            error!("Forecast payload could not be normalized: {}", e);
            DashboardError::upstream(WEATHER_FAILURE_MESSAGE)
        })
    }
}

#[derive(Debug, Clone)]
pub struct WeatherService {
    client: Arc<UpstreamClient>,
    forecast_url: String,
    air_quality_url: String,
}

impl WeatherService {
    pub fn new(client: Arc<UpstreamClient>, config: &UpstreamConfig) -> Self {
        Self {
            client,
            forecast_url: config.forecast_url.trim_end_matches('/').to_string(),
            air_quality_url: config.air_quality_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch forecast and air quality concurrently. Only a forecast failure is an error.
    #[instrument(skip(self))]
    pub async fn fetch_conditions(&self, latitude: f64, longitude: f64) -> Result<Conditions> {
        let (forecast, air_quality) = tokio::join!(
            self.fetch_forecast(latitude, longitude),
            self.fetch_air_quality(latitude, longitude)
        );

        Ok(Conditions {
            forecast: forecast?,
            air_quality,
        })
    }

    /// Full report for an already resolved location
    pub async fn report_for(&self, location: &Location) -> Result<WeatherReport> {
        let conditions = self
            .fetch_conditions(location.latitude, location.longitude)
            .await?;
        let report = conditions.into_report(location)?;
        info!(
            "Weather report ready for {} ({})",
            location.name,
            location.format_coordinates()
        );
        Ok(report)
    }

    /// Current, 24h hourly and 7-day daily series
    pub async fn fetch_forecast(&self, latitude: f64, longitude: f64) -> Result<ForecastResponse> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&current={}&hourly={}&daily={}&timezone=auto&forecast_days={}",
            self.forecast_url,
            latitude,
            longitude,
            open_meteo::CURRENT_FIELDS,
            open_meteo::HOURLY_FIELDS,
            open_meteo::DAILY_FIELDS,
            FORECAST_DAYS
        );

        self.client.get_json("forecast", &url).await.map_err(|e| {
            error!(service = e.service(), "Forecast request failed: {}", e);
            DashboardError::upstream(WEATHER_FAILURE_MESSAGE)
        })
    }

    /// Current air quality; `None` on any failure
    pub async fn fetch_air_quality(&self, latitude: f64, longitude: f64) -> Option<AirQuality> {
        let url = format!(
            "{}/air-quality?latitude={}&longitude={}&current={}",
            self.air_quality_url,
            latitude,
            longitude,
            open_meteo::AIR_QUALITY_FIELDS
        );

        match self
            .client
            .get_json::<AirQualityResponse>("air-quality", &url)
            .await
        {
            Ok(response) => {
                if response.current.is_none() {
                    debug!("Air-quality response had no current block");
                }
                response.current.map(AirQuality::from)
            }
            Err(e) => {
                warn!(service = e.service(), "AQI data not available for this location: {}", e);
                None
            }
        }
    }

    /// Simplified 5-day daily forecast
    #[instrument(skip(self))]
    pub async fn fetch_summary(&self, latitude: f64, longitude: f64) -> Result<ForecastSummary> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&daily={}&timezone=auto&forecast_days={}",
            self.forecast_url,
            latitude,
            longitude,
            open_meteo::SUMMARY_DAILY_FIELDS,
            SUMMARY_DAYS
        );

        let forecast: ForecastResponse =
            self.client.get_json("forecast", &url).await.map_err(|e| {
                error!(service = e.service(), "Forecast summary request failed: {}", e);
                DashboardError::upstream(FORECAST_FAILURE_MESSAGE)
            })?;

        Ok(report::build_summary(&forecast))
    }
}
