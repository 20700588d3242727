//! Location Resolution Module
//!
//! Turns the loosely typed query parameters of the weather endpoints into a
//! [`LocationInput`] and resolves that into a structured [`Location`].

use crate::geocoding::Geocoder;
use crate::models::Location;
use crate::models::location::SELECTED_LOCATION_NAME;
use crate::{DashboardError, Result};
use tracing::debug;

pub const MISSING_LOCATION_MESSAGE: &str =
    "Either city name or coordinates (lat, lon) are required";
pub const MISSING_FORECAST_LOCATION_MESSAGE: &str = "Either city or coordinates are required";
pub const MISSING_COORDINATES_MESSAGE: &str = "Latitude and longitude parameters are required";

/// Where the client wants weather for
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    /// Explicit coordinates, optionally labelled by the client
    Coordinates {
        latitude: f64,
        longitude: f64,
        label: Option<String>,
    },
    /// Free-text city name to geocode
    Name(String),
}

/// Which input wins when a request carries both a city and coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precedence {
    CoordinatesFirst,
    NameFirst,
}

/// Parse one coordinate. Returns `None` when absent or blank.
pub fn parse_coordinate(raw: Option<&str>, name: &str, min: f64, max: f64) -> Result<Option<f64>> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    let value: f64 = raw
        .parse()
        .map_err(|_| DashboardError::bad_request(format!("Invalid {name}: {raw}")))?;
    if !value.is_finite() || value < min || value > max {
        return Err(DashboardError::bad_request(format!(
            "{name} must be between {min} and {max}"
        )));
    }
    Ok(Some(value))
}

/// Parse a `lat`/`lon` pair; both must be present for coordinates to count
pub fn parse_coordinates(lat: Option<&str>, lon: Option<&str>) -> Result<Option<(f64, f64)>> {
    let latitude = parse_coordinate(lat, "Latitude", -90.0, 90.0)?;
    let longitude = parse_coordinate(lon, "Longitude", -180.0, 180.0)?;
    Ok(latitude.zip(longitude))
}

impl LocationInput {
    /// Build the input from `city`, `lat` and `lon` query parameters.
    /// `Ok(None)` when neither a city nor a full coordinate pair was given.
    /// Coordinates are not looked at when a city wins under [`Precedence::NameFirst`].
    pub fn from_query(
        city: Option<&str>,
        lat: Option<&str>,
        lon: Option<&str>,
        precedence: Precedence,
    ) -> Result<Option<Self>> {
        let city = city.map(str::trim).filter(|c| !c.is_empty());
        if let (Precedence::NameFirst, Some(name)) = (precedence, city) {
            return Ok(Some(Self::Name(name.to_string())));
        }
        let coordinates = parse_coordinates(lat, lon)?;

        let by_coordinates = coordinates.map(|(latitude, longitude)| Self::Coordinates {
            latitude,
            longitude,
            label: city.map(str::to_string),
        });
        let by_name = city.map(|c| Self::Name(c.to_string()));

        Ok(match precedence {
            Precedence::CoordinatesFirst => by_coordinates.or(by_name),
            Precedence::NameFirst => by_name.or(by_coordinates),
        })
    }
}

/// Service for resolving location inputs
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve an input. Coordinates are taken as given; names are geocoded.
    pub async fn resolve_location(geocoder: &Geocoder, input: LocationInput) -> Result<Location> {
        debug!("Resolving location input: {:?}", input);

        let location = match input {
            LocationInput::Coordinates {
                latitude,
                longitude,
                label,
            } => Location::new(
                latitude,
                longitude,
                label.unwrap_or_else(|| SELECTED_LOCATION_NAME.to_string()),
            ),
            LocationInput::Name(name) => geocoder.resolve_name(&name).await?,
        };

        debug!(
            "Resolved location: {} at ({}, {})",
            location.name, location.latitude, location.longitude
        );

        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_coordinates_win_for_coordinates_first() {
        let input = LocationInput::from_query(
            Some("Paris"),
            Some("51.5"),
            Some("-0.12"),
            Precedence::CoordinatesFirst,
        )
        .unwrap();
        assert_eq!(
            input,
            Some(LocationInput::Coordinates {
                latitude: 51.5,
                longitude: -0.12,
                label: Some("Paris".to_string())
            })
        );
    }

    #[test]
    fn test_name_wins_for_name_first() {
        let input = LocationInput::from_query(
            Some("Paris"),
            Some("51.5"),
            Some("-0.12"),
            Precedence::NameFirst,
        )
        .unwrap();
        assert_eq!(input, Some(LocationInput::Name("Paris".to_string())));
    }

    #[test]
    fn test_name_first_ignores_malformed_coordinates() {
        let input = LocationInput::from_query(
            Some("Berlin"),
            Some("abc"),
            Some("13"),
            Precedence::NameFirst,
        )
        .unwrap();
        assert_eq!(input, Some(LocationInput::Name("Berlin".to_string())));

        let err = LocationInput::from_query(
            Some("Berlin"),
            Some("abc"),
            Some("13"),
            Precedence::CoordinatesFirst,
        )
        .unwrap_err();
        assert!(matches!(err, DashboardError::BadRequest { .. }));
    }

    #[test]
    fn test_half_coordinates_fall_back_to_name() {
        let input =
            LocationInput::from_query(Some("Oslo"), Some("59.9"), None, Precedence::CoordinatesFirst)
                .unwrap();
        assert_eq!(input, Some(LocationInput::Name("Oslo".to_string())));
    }

    #[test]
    fn test_nothing_given() {
        let input =
            LocationInput::from_query(Some("  "), None, Some("10"), Precedence::NameFirst).unwrap();
        assert!(input.is_none());
    }

    #[rstest]
    #[case("90", true)]
    #[case("-90", true)]
    #[case("90.0001", false)]
    #[case("abc", false)]
    #[case("NaN", false)]
    fn test_latitude_bounds(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(parse_coordinates(Some(raw), Some("0")).is_ok(), ok);
    }

    #[rstest]
    #[case("180", true)]
    #[case("-180.5", false)]
    fn test_longitude_bounds(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(parse_coordinates(Some("0"), Some(raw)).is_ok(), ok);
    }

    #[test]
    fn test_zero_coordinates_are_valid() {
        assert_eq!(parse_coordinates(Some("0"), Some("0")).unwrap(), Some((0.0, 0.0)));
    }
}
