//! Air quality (US EPA AQI) model and classification

use serde::{Deserialize, Serialize};

/// US AQI band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AqiLevel {
    Good,
    Moderate,
    #[serde(rename = "Unhealthy for Sensitive Groups")]
    UnhealthyForSensitiveGroups,
    Unhealthy,
    #[serde(rename = "Very Unhealthy")]
    VeryUnhealthy,
    Hazardous,
}

impl AqiLevel {
    /// Classify an AQI value. Bands are inclusive on their upper bound.
    #[must_use]
    pub fn classify(aqi: i64) -> Self {
        match aqi {
            i64::MIN..=50 => AqiLevel::Good,
            51..=100 => AqiLevel::Moderate,
            101..=150 => AqiLevel::UnhealthyForSensitiveGroups,
            151..=200 => AqiLevel::Unhealthy,
            201..=300 => AqiLevel::VeryUnhealthy,
            _ => AqiLevel::Hazardous,
        }
    }

    /// Display color used by the dashboard
    #[must_use]
    pub const fn color(&self) -> &'static str {
        match self {
            AqiLevel::Good => "#00E400",
            AqiLevel::Moderate => "#FFFF00",
            AqiLevel::UnhealthyForSensitiveGroups => "#FF7E00",
            AqiLevel::Unhealthy => "#FF0000",
            AqiLevel::VeryUnhealthy => "#8F3F97",
            AqiLevel::Hazardous => "#7E0023",
        }
    }
}

/// `{level, color}` pair attached to an AQI reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AqiDescription {
    pub level: AqiLevel,
    pub color: &'static str,
}

impl From<AqiLevel> for AqiDescription {
    fn from(level: AqiLevel) -> Self {
        Self {
            level,
            color: level.color(),
        }
    }
}

/// Current air quality at a location. Pollutants in μg/m³.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQuality {
    pub us_aqi: Option<i64>,
    pub pm10: Option<f64>,
    pub pm2_5: Option<f64>,
    pub co: Option<f64>,
    pub no2: Option<f64>,
    pub so2: Option<f64>,
    pub o3: Option<f64>,
    pub description: Option<AqiDescription>,
}
