//! Location model for geographic coordinates and place metadata

use serde::{Deserialize, Serialize};

/// Name used when no place could be resolved for a pair of coordinates
pub const PLACEHOLDER_NAME: &str = "Your Location";
/// Name used when the client supplied coordinates without a city name
pub const SELECTED_LOCATION_NAME: &str = "Selected Location";
pub const UNKNOWN_COUNTRY: &str = "Unknown";
pub const UNKNOWN_COUNTRY_CODE: &str = "XX";

/// A resolved place. Coordinates are always present; every other field is
/// best effort and may hold one of the placeholder values above.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Display name (city, town, ...)
    pub name: String,
    /// Country name
    pub country: String,
    /// Country code (ISO 3166-1 alpha-2), `XX` when unknown
    pub country_code: String,
    /// State / province
    pub admin1: Option<String>,
    /// County / district
    pub admin2: Option<String>,
    /// IANA timezone, e.g. `Europe/London`
    pub timezone: Option<String>,
}

impl Location {
    /// Create a location with only a name, everything else unknown
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            name: name.into(),
            country: UNKNOWN_COUNTRY.to_string(),
            country_code: UNKNOWN_COUNTRY_CODE.to_string(),
            admin1: None,
            admin2: None,
            timezone: None,
        }
    }

    /// Location for coordinates whose name could not be resolved
    #[must_use]
    pub fn placeholder(latitude: f64, longitude: f64) -> Self {
        Self::new(latitude, longitude, PLACEHOLDER_NAME)
    }

    #[must_use]
    pub fn with_timezone(mut self, timezone: Option<String>) -> Self {
        self.timezone = timezone;
        self
    }

    /// `"{name}, {admin1}, {country}"`, skipping admin1 when absent
    #[must_use]
    pub fn full_name(&self) -> String {
        match self.admin1.as_deref().filter(|a| !a.is_empty()) {
            Some(admin1) => format!("{}, {}, {}", self.name, admin1, self.country),
            None => format!("{}, {}", self.name, self.country),
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_location() {
        let location = Location::placeholder(51.5, -0.12);
        assert_eq!(location.name, "Your Location");
        assert_eq!(location.country, "Unknown");
        assert_eq!(location.country_code, "XX");
        assert!(location.admin1.is_none());
    }

    #[test]
    fn test_full_name() {
        let mut location = Location::new(51.5, -0.12, "London");
        location.country = "United Kingdom".to_string();
        assert_eq!(location.full_name(), "London, United Kingdom");

        location.admin1 = Some("England".to_string());
        assert_eq!(location.full_name(), "London, England, United Kingdom");
    }

    #[test]
    fn test_format_coordinates() {
        let location = Location::new(46.818_234, 8.227_456, "Test");
        assert_eq!(location.format_coordinates(), "46.8182, 8.2275");
    }
}
