//! WMO weather code lookup

use serde::{Deserialize, Serialize};

/// Coarse weather category, serialized as the legacy `main` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionCategory {
    Clear,
    Clouds,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Thunderstorm,
    Unknown,
}

/// Weather condition derived from a WMO code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherCondition {
    #[serde(skip)]
    pub code: Option<i64>,
    #[serde(rename = "main")]
    pub category: ConditionCategory,
    pub description: &'static str,
    #[serde(rename = "icon")]
    pub glyph: &'static str,
}

const DEFAULT_GLYPH: &str = "🌤️";

impl WeatherCondition {
    /// Look up a WMO code. Never fails: unknown codes get the `Unknown` entry.
    #[must_use]
    pub fn from_wmo(code: i64) -> Self {
        use ConditionCategory::*;

        let (category, description, glyph) = match code {
            0 => (Clear, "clear sky", "☀️"),
            1 => (Clear, "mainly clear", "🌤️"),
            2 => (Clouds, "partly cloudy", "⛅"),
            3 => (Clouds, "overcast", "☁️"),
            45 => (Fog, "fog", "🌫️"),
            48 => (Fog, "depositing rime fog", "🌫️"),
            51 => (Drizzle, "light drizzle", "🌦️"),
            53 => (Drizzle, "moderate drizzle", "🌦️"),
            55 => (Drizzle, "dense drizzle", "🌧️"),
            61 => (Rain, "slight rain", "🌧️"),
            63 => (Rain, "moderate rain", "🌧️"),
            65 => (Rain, "heavy rain", "⛈️"),
            71 => (Snow, "slight snow fall", "❄️"),
            73 => (Snow, "moderate snow fall", "❄️"),
            75 => (Snow, "heavy snow fall", "🌨️"),
            95 => (Thunderstorm, "thunderstorm", "⛈️"),
            96 => (Thunderstorm, "thunderstorm with hail", "⛈️"),
            99 => (Thunderstorm, "thunderstorm with heavy hail", "⛈️"),
            _ => {
                return Self {
                    code: Some(code),
                    ..Self::unknown()
                };
            }
        };

        Self {
            code: Some(code),
            category,
            description,
            glyph,
        }
    }

    /// Look up an optional code; a missing code is `Unknown`
    #[must_use]
    pub fn from_optional(code: Option<i64>) -> Self {
        code.map_or_else(Self::unknown, Self::from_wmo)
    }

    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            code: None,
            category: ConditionCategory::Unknown,
            description: "unknown",
            glyph: DEFAULT_GLYPH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, ConditionCategory::Clear)]
    #[case(1, ConditionCategory::Clear)]
    #[case(2, ConditionCategory::Clouds)]
    #[case(3, ConditionCategory::Clouds)]
    #[case(45, ConditionCategory::Fog)]
    #[case(48, ConditionCategory::Fog)]
    #[case(51, ConditionCategory::Drizzle)]
    #[case(53, ConditionCategory::Drizzle)]
    #[case(55, ConditionCategory::Drizzle)]
    #[case(61, ConditionCategory::Rain)]
    #[case(63, ConditionCategory::Rain)]
    #[case(65, ConditionCategory::Rain)]
    #[case(71, ConditionCategory::Snow)]
    #[case(73, ConditionCategory::Snow)]
    #[case(75, ConditionCategory::Snow)]
    #[case(95, ConditionCategory::Thunderstorm)]
    #[case(96, ConditionCategory::Thunderstorm)]
    #[case(99, ConditionCategory::Thunderstorm)]
    fn test_documented_codes(#[case] code: i64, #[case] expected: ConditionCategory) {
        let condition = WeatherCondition::from_wmo(code);
        assert_eq!(condition.category, expected);
        assert_eq!(condition.code, Some(code));
        assert_ne!(condition.description, "unknown");
    }

    #[rstest]
    #[case(-1)]
    #[case(4)]
    #[case(56)]
    #[case(80)]
    #[case(100)]
    #[case(i64::MAX)]
    fn test_unknown_codes_fall_back(#[case] code: i64) {
        let condition = WeatherCondition::from_wmo(code);
        assert_eq!(condition.category, ConditionCategory::Unknown);
        assert_eq!(condition.description, "unknown");
        assert_eq!(condition.glyph, DEFAULT_GLYPH);
    }

    #[test]
    fn test_missing_code_is_unknown() {
        assert_eq!(
            WeatherCondition::from_optional(None).category,
            ConditionCategory::Unknown
        );
        assert_eq!(
            WeatherCondition::from_optional(Some(3)).description,
            "overcast"
        );
    }

    #[test]
    fn test_serializes_legacy_shape() {
        let json = serde_json::to_value(WeatherCondition::from_wmo(0)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"main": "Clear", "description": "clear sky", "icon": "☀️"})
        );
    }
}
