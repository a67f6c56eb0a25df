//! Geocoding Service
//!
//! Resolves free-text place names to coordinates. Two providers are used:
//! Nominatim (no key, primary) and Geoapify (keyed, used for the emergency
//! lookup). A failed lookup never fails the caller: it yields an absent
//! coordinate and a warning in the log.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::AppConfig;
use crate::models::coordinate::{parse_degrees, Coordinate};
use crate::models::geoapify::FeatureCollection;
use crate::services::http::{endpoint, get_json, FetchError};

#[derive(Debug, Deserialize)]
struct NominatimResult {
    #[serde(default)]
    lat: Value,
    #[serde(default)]
    lon: Value,
}

#[derive(Clone)]
pub struct GeocodingService {
    http_client: Client,
    nominatim_url: String,
    geoapify_url: String,
    geoapify_api_key: Option<String>,
}

impl GeocodingService {
    pub fn new(config: &AppConfig, http_client: Client) -> Self {
        Self {
            http_client,
            nominatim_url: config.nominatim_url.clone(),
            geoapify_url: config.geoapify_url.clone(),
            geoapify_api_key: config.geoapify_api_key.clone(),
        }
    }

    /// Resolve a place through Nominatim, taking the first candidate.
    pub async fn resolve(&self, place: &str) -> Coordinate {
        let place = place.trim();
        if place.is_empty() {
            return Coordinate::absent();
        }

        match self.fetch_nominatim(place).await {
            Ok(Some(coordinate)) => {
                log::debug!("Resolved '{}' to {:?}", place, coordinate.pair());
                coordinate
            }
            Ok(None) => {
                log::info!("No geocoding candidates for '{}'", place);
                Coordinate::absent()
            }
            Err(e) => {
                log::warn!("Geocoding '{}' failed: {}", place, e);
                Coordinate::absent()
            }
        }
    }

    /// Resolve a place through the Geoapify geocoder.
    pub async fn resolve_with_geoapify(&self, place: &str) -> Coordinate {
        let place = place.trim();
        if place.is_empty() {
            return Coordinate::absent();
        }

        match self.fetch_geoapify(place).await {
            Ok(Some(coordinate)) => coordinate,
            Ok(None) => {
                log::info!("Geoapify found no match for '{}'", place);
                Coordinate::absent()
            }
            Err(e) => {
                log::warn!("Geoapify geocoding '{}' failed: {}", place, e);
                Coordinate::absent()
            }
        }
    }

    async fn fetch_nominatim(&self, place: &str) -> Result<Option<Coordinate>, FetchError> {
        let url = endpoint(&self.nominatim_url, "search");
        let results: Vec<NominatimResult> =
            get_json(&self.http_client, &url, &[("format", "json"), ("q", place)]).await?;

        let Some(first) = results.first() else {
            return Ok(None);
        };

        match (parse_degrees(&first.lat), parse_degrees(&first.lon)) {
            (Some(lat), Some(lon)) => Ok(Some(Coordinate::new(lat, lon))),
            _ => Err(FetchError::Decode(format!(
                "unparsable lat/lon in first result: {} / {}",
                first.lat, first.lon
            ))),
        }
    }

    async fn fetch_geoapify(&self, place: &str) -> Result<Option<Coordinate>, FetchError> {
        let api_key = self
            .geoapify_api_key
            .as_deref()
            .ok_or(FetchError::MissingKey("GEOAPIFY_API_KEY"))?;

        let url = endpoint(&self.geoapify_url, "v1/geocode/search");
        let collection: FeatureCollection = get_json(
            &self.http_client,
            &url,
            &[("text", place), ("apiKey", api_key)],
        )
        .await?;

        Ok(collection
            .features
            .first()
            .and_then(|feature| feature.coordinate()))
    }
}
