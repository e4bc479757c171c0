use crate::domain::model::{Coordinate, ProgressEvent};
use crate::domain::ports::{Geocoder, Reporter};
use crate::utils::error::{PlacesError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const GOOGLE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const DEFAULT_USER_AGENT: &str = concat!("placemap/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Resolves one place, turning a "not found" answer into `None`.
///
/// Any other geocoder failure is returned as an error and ends the run.
pub async fn resolve<G, R>(geocoder: &G, reporter: &R, place: &str) -> Result<Option<Coordinate>>
where
    G: Geocoder + ?Sized,
    R: Reporter + ?Sized,
{
    match geocoder.geocode(place).await {
        Ok(coordinate) => {
            reporter.report(ProgressEvent::Resolved {
                place: place.to_string(),
            });
            Ok(Some(coordinate))
        }
        Err(e) if e.is_not_found() => {
            reporter.report(ProgressEvent::Unresolved {
                place: place.to_string(),
            });
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocoderProvider {
    #[default]
    Nominatim,
    Google,
}

impl std::str::FromStr for GeocoderProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nominatim" | "osm" => Ok(Self::Nominatim),
            "google" => Ok(Self::Google),
            _ => Err(format!(
                "Unknown geocoder '{}'. Use 'nominatim' or 'google'.",
                s
            )),
        }
    }
}

/// Everything needed to build a [`Geocoder`] for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocoderSettings {
    pub provider: GeocoderProvider,
    /// Overrides the provider's public endpoint.
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            provider: GeocoderProvider::default(),
            endpoint: None,
            api_key: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

impl GeocoderSettings {
    pub fn endpoint(&self) -> &str {
        match (&self.endpoint, self.provider) {
            (Some(endpoint), _) => endpoint,
            (None, GeocoderProvider::Nominatim) => NOMINATIM_ENDPOINT,
            (None, GeocoderProvider::Google) => GOOGLE_ENDPOINT,
        }
    }

    pub fn build(&self) -> Result<Box<dyn Geocoder>> {
        let client = Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.timeout)
            .build()?;

        let geocoder: Box<dyn Geocoder> = match self.provider {
            GeocoderProvider::Nominatim => {
                Box::new(NominatimGeocoder::with_client(client, self.endpoint()))
            }
            GeocoderProvider::Google => {
                let api_key = self.api_key.clone().ok_or_else(|| {
                    PlacesError::MissingConfigError {
                        field: "geocoder.api_key".to_string(),
                    }
                })?;
                Box::new(GoogleGeocoder::with_client(client, self.endpoint(), api_key))
            }
        };
        Ok(geocoder)
    }
}

#[async_trait]
impl Geocoder for Box<dyn Geocoder> {
    async fn geocode(&self, place: &str) -> Result<Coordinate> {
        (**self).geocode(place).await
    }
}

#[async_trait]
impl<G: Geocoder + ?Sized> Geocoder for std::sync::Arc<G> {
    async fn geocode(&self, place: &str) -> Result<Coordinate> {
        (**self).geocode(place).await
    }
}

// ─── Nominatim ──────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct NominatimResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// OpenStreetMap Nominatim search API.
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
            .build()?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, place: &str) -> Result<Coordinate> {
        tracing::debug!("Making Nominatim request to {} for: {}", self.endpoint, place);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        let results: Vec<NominatimResult> = serde_json::from_slice(&body)?;
        let first = results
            .into_iter()
            .next()
            .ok_or_else(|| PlacesError::PlaceNotFound {
                place: place.to_string(),
            })?;

        if let Some(display_name) = &first.display_name {
            tracing::debug!("Nominatim matched '{}' to {}", place, display_name);
        }

        Ok(Coordinate::new(
            parse_degrees(place, "lat", &first.lat)?,
            parse_degrees(place, "lon", &first.lon)?,
        ))
    }
}

fn parse_degrees(place: &str, field: &str, raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(PlacesError::InvalidResponseError {
            place: place.to_string(),
            message: format!("{} is not a finite number: '{}'", field, raw),
        }),
    }
}

// ─── Google Geocoding ───────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct GoogleResponse {
    status: String,
    #[serde(default)]
    results: Vec<GoogleResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Deserialize, Debug)]
struct GoogleResult {
    geometry: GoogleGeometry,
}

#[derive(Deserialize, Debug)]
struct GoogleGeometry {
    location: GoogleLocation,
}

#[derive(Deserialize, Debug)]
struct GoogleLocation {
    lat: f64,
    lng: f64,
}

/// Google Geocoding API. `ZERO_RESULTS` is the only status treated as "not found".
pub struct GoogleGeocoder {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GoogleGeocoder {
    pub fn with_client(client: Client, endpoint: impl Into<String>, api_key: String) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, place: &str) -> Result<Coordinate> {
        tracing::debug!("Making Google geocoding request for: {}", place);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("address", place), ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        let body: GoogleResponse = serde_json::from_slice(&body)?;
        match body.status.as_str() {
            "OK" => body
                .results
                .into_iter()
                .next()
                .map(|r| Coordinate::new(r.geometry.location.lat, r.geometry.location.lng))
                .ok_or_else(|| PlacesError::InvalidResponseError {
                    place: place.to_string(),
                    message: "status OK without results".to_string(),
                }),
            "ZERO_RESULTS" => Err(PlacesError::PlaceNotFound {
                place: place.to_string(),
            }),
            _ => Err(PlacesError::GeocoderStatusError {
                place: place.to_string(),
                status: body.status,
                message: body.error_message,
            }),
        }
    }
}
