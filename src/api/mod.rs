use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::{
    DashboardError, Result, VERSION,
    config::{DashboardConfig, SearchConfig},
    geocoding::Geocoder,
    location_resolver::{
        LocationInput, LocationResolver, MISSING_COORDINATES_MESSAGE,
        MISSING_FORECAST_LOCATION_MESSAGE, MISSING_LOCATION_MESSAGE, Precedence,
        parse_coordinates,
    },
    models::{CitySuggestion, ForecastSummary, WeatherReport},
    upstream::UpstreamClient,
    weather::WeatherService,
};

pub const SERVICE_NAME: &str = "Weather API (Open-Meteo)";
const FEATURES: [&str; 4] = ["Weather Data", "Air Quality Index", "Geocoding", "City Search"];
const LOCATION_NOT_FOUND_MESSAGE: &str = "Location not found";

/// Services shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub weather: Arc<WeatherService>,
    pub geocoder: Arc<Geocoder>,
    pub search: SearchConfig,
}

impl AppState {
    pub fn from_config(config: &DashboardConfig) -> anyhow::Result<Self> {
        let client = Arc::new(UpstreamClient::new(&config.upstream)?);
        Ok(Self {
            weather: Arc::new(WeatherService::new(client.clone(), &config.upstream)),
            geocoder: Arc::new(Geocoder::new(client, &config.upstream)),
            search: config.search.clone(),
        })
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::NotFound { .. } => StatusCode::NOT_FOUND,
            DashboardError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            DashboardError::UpstreamUnavailable { .. } | DashboardError::Config { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "message": self.user_message() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub city: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CoordinatesQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<String>,
}

#[derive(Serialize)]
pub struct CitySearchResponse {
    pub cities: Vec<CitySuggestion>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub service: &'static str,
    pub version: &'static str,
    pub features: Vec<&'static str>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather/by-city", get(weather_by_city))
        .route("/weather/city", get(weather_by_city))
        .route("/weather/by-coordinates", get(weather_by_coordinates))
        .route("/weather/coordinates", get(weather_by_coordinates))
        .route("/weather/forecast", get(forecast))
        .route("/cities/search", get(search_cities))
        .route("/health", get(health))
        .with_state(state)
}

async fn weather_by_city(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<WeatherReport>> {
    let input = LocationInput::from_query(
        query.city.as_deref(),
        query.lat.as_deref(),
        query.lon.as_deref(),
        Precedence::CoordinatesFirst,
    )?
    .ok_or_else(|| DashboardError::bad_request(MISSING_LOCATION_MESSAGE))?;

    let location = LocationResolver::resolve_location(&state.geocoder, input).await?;
    let report = state.weather.report_for(&location).await?;
    Ok(Json(report))
}

async fn weather_by_coordinates(
    State(state): State<AppState>,
    Query(query): Query<CoordinatesQuery>,
) -> Result<Json<WeatherReport>> {
    let (latitude, longitude) = parse_coordinates(query.lat.as_deref(), query.lon.as_deref())?
        .ok_or_else(|| DashboardError::bad_request(MISSING_COORDINATES_MESSAGE))?;

    let conditions = state.weather.fetch_conditions(latitude, longitude).await?;
    let location = state
        .geocoder
        .resolve_coordinates(latitude, longitude, conditions.timezone())
        .await;
    info!("Serving weather for {}", location.full_name());

    let report = conditions.into_report(&location)?;
    Ok(Json(report))
}

async fn forecast(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<ForecastSummary>> {
    let input = LocationInput::from_query(
        query.city.as_deref(),
        query.lat.as_deref(),
        query.lon.as_deref(),
        Precedence::NameFirst,
    )?
    .ok_or_else(|| DashboardError::bad_request(MISSING_FORECAST_LOCATION_MESSAGE))?;

    let location = LocationResolver::resolve_location(&state.geocoder, input)
        .await
        .map_err(|e| match e {
            DashboardError::NotFound { .. } => {
                DashboardError::not_found(LOCATION_NOT_FOUND_MESSAGE)
            }
            other => other,
        })?;

    let summary = state
        .weather
        .fetch_summary(location.latitude, location.longitude)
        .await?;
    Ok(Json(summary))
}

async fn search_cities(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<CitySearchResponse>> {
    let q = query.q.unwrap_or_default();
    let limit = resolve_limit(query.limit.as_deref(), &state.search);

    let cities = state.geocoder.search_cities(&q, limit).await?;
    Ok(Json(CitySearchResponse { cities }))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now().to_rfc3339(),
        service: SERVICE_NAME,
        version: VERSION,
        features: FEATURES.to_vec(),
    })
}

/// Requested suggestion count, clamped to `[1, max_limit]`
fn resolve_limit(raw: Option<&str>, search: &SearchConfig) -> usize {
    let requested = match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => search.default_limit,
        Some(raw) => match raw.parse::<i64>() {
            Ok(value) => usize::try_from(value.max(1)).unwrap_or(search.default_limit),
            Err(_) => {
                warn!("Ignoring invalid search limit {}", raw);
                search.default_limit
            }
        },
    };
    let max = search.max_limit.max(1);
    if requested > max {
        debug!("Search limit {} capped at {}", requested, max);
    }
    requested.clamp(1, max)
}
