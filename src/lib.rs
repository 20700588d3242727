//! Weather dashboard backend
//!
//! Aggregates the Open-Meteo forecast, geocoding and air-quality APIs with
//! BigDataCloud and Nominatim reverse geocoding, and serves the normalized
//! result over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod upstream;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::DashboardConfig;
pub use error::{DashboardError, UpstreamError};
pub use geocoding::Geocoder;
pub use location_resolver::{LocationInput, LocationResolver};
pub use models::{CitySuggestion, Location, WeatherReport};
pub use weather::WeatherService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
