//! Forward geocoding and city search via the Open-Meteo geocoding API, plus
//! the reverse-geocoding cascade.

use crate::config::UpstreamConfig;
use crate::error::UpstreamError;
use crate::models::location::{UNKNOWN_COUNTRY, UNKNOWN_COUNTRY_CODE};
use crate::models::{CitySuggestion, Location};
use crate::upstream::UpstreamClient;
use crate::{DashboardError, Result};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub mod reverse;

pub use reverse::{Place, ReverseCascade, ReverseGeocoder};

pub const CITY_NOT_FOUND_MESSAGE: &str = "City not found";
pub const SEARCH_QUERY_MESSAGE: &str =
    "Query parameter \"q\" is required and must be at least 2 characters";

/// Candidates requested when resolving a single city name
const RESOLVE_CANDIDATES: usize = 5;
const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    country: Option<String>,
    country_code: Option<String>,
    admin1: Option<String>,
    admin2: Option<String>,
    timezone: Option<String>,
    population: Option<u64>,
}

impl GeocodingResult {
    /// Entries worth offering as suggestions
    fn is_usable(&self) -> bool {
        let name_ok = self
            .name
            .as_deref()
            .is_some_and(|n| n.chars().count() >= MIN_QUERY_CHARS && !n.eq_ignore_ascii_case("unknown"));
        let country_ok = self
            .country
            .as_deref()
            .is_some_and(|c| !c.is_empty() && c != UNKNOWN_COUNTRY);

        name_ok && country_ok && self.latitude.is_some() && self.longitude.is_some()
    }

    fn into_suggestion(self) -> Option<CitySuggestion> {
        let latitude = self.latitude?;
        let longitude = self.longitude?;
        let location = Location {
            latitude,
            longitude,
            name: self.name?,
            country: self.country?,
            country_code: self
                .country_code
                .unwrap_or_else(|| UNKNOWN_COUNTRY_CODE.to_string()),
            admin1: self.admin1,
            admin2: self.admin2,
            timezone: self.timezone,
        };

        Some(CitySuggestion {
            id: CitySuggestion::make_id(latitude, longitude),
            display_name: location.full_name(),
            name: location.name,
            country: location.country,
            country_code: location.country_code,
            admin1: location.admin1,
            admin2: location.admin2,
            latitude,
            longitude,
            timezone: location.timezone,
            population: self.population.unwrap_or(0),
        })
    }
}

/// Name-based lookups plus the reverse cascade for bare coordinates
pub struct Geocoder {
    client: Arc<UpstreamClient>,
    base_url: String,
    reverse: ReverseCascade,
}

impl Geocoder {
    pub fn new(client: Arc<UpstreamClient>, config: &UpstreamConfig) -> Self {
        Self {
            reverse: ReverseCascade::from_config(client.clone(), config),
            client,
            base_url: config.geocoding_url.trim_end_matches('/').to_string(),
        }
    }

    /// Replace the reverse-geocoding strategies
    #[must_use]
    pub fn with_reverse(mut self, reverse: ReverseCascade) -> Self {
        self.reverse = reverse;
        self
    }

    async fn search(&self, name: &str, count: usize) -> std::result::Result<Vec<GeocodingResult>, UpstreamError> {
        let url = format!(
            "{}/search?name={}&count={}&language=en&format=json",
            self.base_url,
            urlencoding::encode(name),
            count
        );
        let response: GeocodingResponse = self.client.get_json("geocoding", &url).await?;
        Ok(response.results.unwrap_or_default())
    }

    /// Resolve a free-text city name to its best match
    #[instrument(skip(self))]
    pub async fn resolve_name(&self, name: &str) -> Result<Location> {
        let results = self.search(name, RESOLVE_CANDIDATES).await.map_err(|e| {
            warn!(service = e.service(), "Geocoding failed for {}: {}", name, e);
            DashboardError::not_found(CITY_NOT_FOUND_MESSAGE)
        })?;

        let Some(best) = results.into_iter().next() else {
            debug!("No geocoding results for {}", name);
            return Err(DashboardError::not_found(CITY_NOT_FOUND_MESSAGE));
        };
        let (Some(latitude), Some(longitude)) = (best.latitude, best.longitude) else {
            warn!("Geocoding result for {} has no coordinates", name);
            return Err(DashboardError::not_found(CITY_NOT_FOUND_MESSAGE));
        };

        let location = Location {
            latitude,
            longitude,
            name: best.name.unwrap_or_else(|| name.to_string()),
            country: best.country.unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
            country_code: best
                .country_code
                .unwrap_or_else(|| UNKNOWN_COUNTRY_CODE.to_string()),
            admin1: best.admin1,
            admin2: best.admin2,
            timezone: best.timezone,
        };
        info!(
            "Resolved {} to {} ({})",
            name,
            location.full_name(),
            location.format_coordinates()
        );
        Ok(location)
    }

    /// Autocomplete suggestions. Upstream failures yield an empty list.
    #[instrument(skip(self))]
    pub async fn search_cities(&self, query: &str, limit: usize) -> Result<Vec<CitySuggestion>> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Err(DashboardError::bad_request(SEARCH_QUERY_MESSAGE));
        }
        let limit = limit.max(1);

        // Over-fetch so filtering still leaves `limit` entries
        let results = match self.search(query, limit.saturating_mul(2)).await {
            Ok(results) => results,
            Err(e) => {
                warn!(service = e.service(), "City search failed for {}: {}", query, e);
                return Ok(Vec::new());
            }
        };

        let suggestions: Vec<CitySuggestion> = results
            .into_iter()
            .filter(GeocodingResult::is_usable)
            .filter_map(GeocodingResult::into_suggestion)
            .take(limit)
            .collect();

        debug!("{} suggestions for {}", suggestions.len(), query);
        Ok(suggestions)
    }

    /// Name for bare coordinates; see [`ReverseCascade::resolve`]
    pub async fn resolve_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
        timezone: Option<&str>,
    ) -> Location {
        self.reverse.resolve(latitude, longitude, timezone).await
    }
}
