//! Reverse geocoding: coordinates to a place name.
//!
//! No free service has full coverage, so lookups run as an ordered cascade of
//! strategies. The first one to produce a place wins; failures are logged and
//! the next strategy is tried. When all of them come up empty the IANA
//! timezone from the forecast is split into a rough place name.

use crate::config::UpstreamConfig;
use crate::error::UpstreamError;
use crate::models::Location;
use crate::models::location::{PLACEHOLDER_NAME, UNKNOWN_COUNTRY, UNKNOWN_COUNTRY_CODE};
use crate::upstream::UpstreamClient;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Place metadata produced by a reverse lookup
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub country: String,
    pub country_code: String,
    pub admin1: Option<String>,
    pub admin2: Option<String>,
}

impl Place {
    fn into_location(self, latitude: f64, longitude: f64, timezone: Option<&str>) -> Location {
        Location {
            latitude,
            longitude,
            name: self.name,
            country: self.country,
            country_code: self.country_code,
            admin1: self.admin1,
            admin2: self.admin2,
            timezone: timezone.map(str::to_string),
        }
    }
}

/// One reverse-geocoding strategy. `Ok(None)` means the service answered but knew nothing.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    fn name(&self) -> &'static str;

    async fn lookup(&self, latitude: f64, longitude: f64) -> Result<Option<Place>, UpstreamError>;
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// BigDataCloud client-side reverse geocoding (locality level)
pub struct BigDataCloud {
    client: Arc<UpstreamClient>,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BigDataCloudResponse {
    city: Option<String>,
    locality: Option<String>,
    principal_subdivision: Option<String>,
    country_name: Option<String>,
    country_code: Option<String>,
}

impl BigDataCloud {
    pub fn new(client: Arc<UpstreamClient>, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl ReverseGeocoder for BigDataCloud {
    fn name(&self) -> &'static str {
        "bigdatacloud"
    }

    async fn lookup(&self, latitude: f64, longitude: f64) -> Result<Option<Place>, UpstreamError> {
        let url = format!(
            "{}/reverse-geocode-client?latitude={}&longitude={}&localityLanguage=en",
            self.base_url, latitude, longitude
        );
        let response: BigDataCloudResponse = self
            .client
            .get_json_with_timeout(self.name(), &url, self.timeout)
            .await?;

        let city = non_empty(response.city);
        let locality = non_empty(response.locality);
        let subdivision = non_empty(response.principal_subdivision);

        let Some(name) = city.or_else(|| locality.clone()) else {
            return Ok(None);
        };

        Ok(Some(Place {
            name,
            country: non_empty(response.country_name).unwrap_or_else(|| UNKNOWN_COUNTRY.into()),
            country_code: non_empty(response.country_code)
                .unwrap_or_else(|| UNKNOWN_COUNTRY_CODE.into()),
            admin1: subdivision,
            admin2: locality,
        }))
    }
}

/// OpenStreetMap Nominatim reverse geocoding (address components)
pub struct Nominatim {
    client: Arc<UpstreamClient>,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    county: Option<String>,
    state: Option<String>,
    province: Option<String>,
    region: Option<String>,
    district: Option<String>,
    country: Option<String>,
    country_code: Option<String>,
}

impl Nominatim {
    pub fn new(client: Arc<UpstreamClient>, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl ReverseGeocoder for Nominatim {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    async fn lookup(&self, latitude: f64, longitude: f64) -> Result<Option<Place>, UpstreamError> {
        let url = format!(
            "{}/reverse?format=json&lat={}&lon={}&zoom=10&addressdetails=1",
            self.base_url, latitude, longitude
        );
        let response: NominatimResponse = self
            .client
            .get_json_with_timeout(self.name(), &url, self.timeout)
            .await?;

        let Some(addr) = response.address else {
            return Ok(None);
        };

        let county = non_empty(addr.county);
        let name = non_empty(addr.city)
            .or_else(|| non_empty(addr.town))
            .or_else(|| non_empty(addr.village))
            .or_else(|| non_empty(addr.municipality))
            .or_else(|| county.clone())
            .unwrap_or_else(|| PLACEHOLDER_NAME.into());

        Ok(Some(Place {
            name,
            country: non_empty(addr.country).unwrap_or_else(|| UNKNOWN_COUNTRY.into()),
            country_code: non_empty(addr.country_code)
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| UNKNOWN_COUNTRY_CODE.into()),
            admin1: non_empty(addr.state)
                .or_else(|| non_empty(addr.province))
                .or_else(|| non_empty(addr.region)),
            admin2: county.or_else(|| non_empty(addr.district)),
        }))
    }
}

/// Derive a rough place from an IANA zone: `America/New_York` -> "New York", admin1 "America".
/// Zones without a `/` (e.g. `UTC`) yield nothing.
#[must_use]
pub fn place_from_timezone(timezone: &str) -> Option<Place> {
    let parts: Vec<&str> = timezone.split('/').collect();
    if parts.len() < 2 {
        return None;
    }
    let first = parts.first()?;
    let last = parts.last()?;

    Some(Place {
        name: last.replace('_', " "),
        country: UNKNOWN_COUNTRY.to_string(),
        country_code: UNKNOWN_COUNTRY_CODE.to_string(),
        admin1: Some(first.replace('_', " ")),
        admin2: None,
    })
}

/// Ordered list of reverse-geocoding strategies
pub struct ReverseCascade {
    strategies: Vec<Box<dyn ReverseGeocoder>>,
}

impl ReverseCascade {
    pub fn new(strategies: Vec<Box<dyn ReverseGeocoder>>) -> Self {
        Self { strategies }
    }

    /// BigDataCloud, then Nominatim
    pub fn from_config(client: Arc<UpstreamClient>, config: &UpstreamConfig) -> Self {
        let timeout = config.reverse_timeout();
        Self::new(vec![
            Box::new(BigDataCloud::new(
                client.clone(),
                &config.reverse_primary_url,
                timeout,
            )),
            Box::new(Nominatim::new(client, &config.reverse_secondary_url, timeout)),
        ])
    }

    /// Resolve coordinates to a location. Never fails; falls back to the
    /// timezone heuristic and finally to a placeholder name.
    pub async fn resolve(&self, latitude: f64, longitude: f64, timezone: Option<&str>) -> Location {
        for strategy in &self.strategies {
            match strategy.lookup(latitude, longitude).await {
                Ok(Some(place)) => {
                    info!("Location found via {}: {}", strategy.name(), place.name);
                    return place.into_location(latitude, longitude, timezone);
                }
                Ok(None) => debug!("{} returned no place", strategy.name()),
                Err(e) => warn!(service = e.service(), "Reverse geocoding failed: {}", e),
            }
        }

        match timezone.and_then(place_from_timezone) {
            Some(place) => {
                info!("Location fallback to timezone: {}", place.name);
                place.into_location(latitude, longitude, timezone)
            }
            None => {
                warn!("All reverse geocoding strategies failed");
                Location::placeholder(latitude, longitude).with_timezone(timezone.map(str::to_string))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    enum Outcome {
        Found(&'static str),
        Empty,
        Fail,
    }

    struct Scripted {
        outcome: Outcome,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ReverseGeocoder for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn lookup(&self, _: f64, _: f64) -> Result<Option<Place>, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                Outcome::Found(name) => Ok(Some(Place {
                    name: name.to_string(),
                    country: "India".to_string(),
                    country_code: "IN".to_string(),
                    admin1: None,
                    admin2: None,
                })),
                Outcome::Empty => Ok(None),
                Outcome::Fail => Err(UpstreamError::Timeout { service: "scripted" }),
            }
        }
    }

    fn scripted(outcome: Outcome) -> (Box<dyn ReverseGeocoder>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategy = Box::new(Scripted {
            outcome,
            calls: calls.clone(),
        });
        (strategy, calls)
    }

    #[tokio::test]
    async fn test_first_success_stops_cascade() {
        let (a, a_calls) = scripted(Outcome::Found("Kolkata"));
        let (b, b_calls) = scripted(Outcome::Found("Howrah"));
        let cascade = ReverseCascade::new(vec![a, b]);

        let location = cascade.resolve(22.57, 88.36, Some("Asia/Kolkata")).await;

        assert_eq!(location.name, "Kolkata");
        assert_eq!(location.country_code, "IN");
        assert_eq!(location.timezone.as_deref(), Some("Asia/Kolkata"));
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_falls_through_failure_and_empty() {
        let (a, _) = scripted(Outcome::Fail);
        let (b, b_calls) = scripted(Outcome::Empty);
        let (c, _) = scripted(Outcome::Found("Howrah"));
        let cascade = ReverseCascade::new(vec![a, b, c]);

        let location = cascade.resolve(22.57, 88.36, None).await;

        assert_eq!(location.name, "Howrah");
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_timezone_fallback() {
        let (a, _) = scripted(Outcome::Fail);
        let (b, _) = scripted(Outcome::Fail);
        let cascade = ReverseCascade::new(vec![a, b]);

        let location = cascade.resolve(22.57, 88.36, Some("Asia/Kolkata")).await;

        assert_eq!(location.name, "Kolkata");
        assert_eq!(location.admin1.as_deref(), Some("Asia"));
        assert_eq!(location.country_code, "XX");
    }

    #[tokio::test]
    async fn test_placeholder_without_timezone() {
        let (a, _) = scripted(Outcome::Empty);
        let cascade = ReverseCascade::new(vec![a]);

        let location = cascade.resolve(0.0, 0.0, None).await;
        assert_eq!(location.name, "Your Location");
        assert_eq!(location.country, "Unknown");

        let location = cascade.resolve(0.0, 0.0, Some("UTC")).await;
        assert_eq!(location.name, "Your Location");
        assert_eq!(location.timezone.as_deref(), Some("UTC"));
    }

    #[test]
    fn test_place_from_timezone() {
        let place = place_from_timezone("America/Argentina/Buenos_Aires").unwrap();
        assert_eq!(place.name, "Buenos Aires");
        assert_eq!(place.admin1.as_deref(), Some("America"));

        assert!(place_from_timezone("UTC").is_none());
    }

    fn client() -> Arc<UpstreamClient> {
        Arc::new(UpstreamClient::new(&UpstreamConfig::default()).unwrap())
    }

    #[tokio::test]
    async fn test_bigdatacloud_lookup() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse-geocode-client"))
            .and(query_param("localityLanguage", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "city": "",
                "locality": "Shoreditch",
                "principalSubdivision": "England",
                "countryName": "United Kingdom",
                "countryCode": "GB"
            })))
            .mount(&mock_server)
            .await;

        let geocoder = BigDataCloud::new(client(), &mock_server.uri(), Duration::from_secs(5));
        let place = geocoder.lookup(51.52, -0.08).await.unwrap().unwrap();

        assert_eq!(place.name, "Shoreditch");
        assert_eq!(place.admin1.as_deref(), Some("England"));
        assert_eq!(place.admin2.as_deref(), Some("Shoreditch"));
        assert_eq!(place.country_code, "GB");
    }

    #[tokio::test]
    async fn test_bigdatacloud_without_city_is_empty() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "city": "",
                "locality": "",
                "principalSubdivision": "Atlantic Ocean"
            })))
            .mount(&mock_server)
            .await;

        let geocoder = BigDataCloud::new(client(), &mock_server.uri(), Duration::from_secs(5));
        assert!(geocoder.lookup(30.0, -40.0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_nominatim_lookup() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("zoom", "10"))
            .and(header("user-agent", UpstreamConfig::default().user_agent.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "address": {
                    "village": "Grindelwald",
                    "county": "Interlaken-Oberhasli",
                    "state": "Bern",
                    "country": "Switzerland",
                    "country_code": "ch"
                }
            })))
            .mount(&mock_server)
            .await;

        let geocoder = Nominatim::new(client(), &mock_server.uri(), Duration::from_secs(5));
        let place = geocoder.lookup(46.62, 8.04).await.unwrap().unwrap();

        assert_eq!(place.name, "Grindelwald");
        assert_eq!(place.admin1.as_deref(), Some("Bern"));
        assert_eq!(place.admin2.as_deref(), Some("Interlaken-Oberhasli"));
        assert_eq!(place.country_code, "CH");
    }

    #[tokio::test]
    async fn test_cascade_skips_nominatim_after_bigdatacloud_success() {
        let primary = MockServer::start().await;
        let secondary = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "city": "London", "principalSubdivision": "England",
                "countryName": "United Kingdom", "countryCode": "GB"
            })))
            .mount(&primary)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&secondary)
            .await;

        let config = UpstreamConfig {
            reverse_primary_url: primary.uri(),
            reverse_secondary_url: secondary.uri(),
            ..UpstreamConfig::default()
        };
        let cascade = ReverseCascade::from_config(client(), &config);
        let location = cascade.resolve(51.5, -0.12, Some("Europe/London")).await;

        assert_eq!(location.name, "London");
        assert_eq!(location.full_name(), "London, England, United Kingdom");
    }

    #[tokio::test]
    async fn test_cascade_uses_nominatim_when_bigdatacloud_fails() {
        let primary = MockServer::start().await;
        let secondary = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&primary)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "address": {"town": "Hebden Bridge", "country": "United Kingdom", "country_code": "gb"}
            })))
            .expect(1)
            .mount(&secondary)
            .await;

        let config = UpstreamConfig {
            reverse_primary_url: primary.uri(),
            reverse_secondary_url: secondary.uri(),
            ..UpstreamConfig::default()
        };
        let cascade = ReverseCascade::from_config(client(), &config);
        let location = cascade.resolve(53.74, -2.01, None).await;

        assert_eq!(location.name, "Hebden Bridge");
        assert_eq!(location.country_code, "GB");
    }
}
