//! Attraction Service
//!
//! Finds points of interest around a destination with the Geoapify places
//! API. When nothing comes back a budget-keyed list of generic places is
//! generated instead, so a trip plan is never left without content.

use futures::future::join_all;
use rand::seq::SliceRandom;
use reqwest::Client;

use crate::config::AppConfig;
use crate::models::attraction::Attraction;
use crate::models::coordinate::Coordinate;
use crate::models::geoapify::{Feature, FeatureCollection};
use crate::models::trip::Budget;
use crate::services::http::{endpoint, get_json, FetchError};
use crate::services::image_service::ImageService;
use crate::services::text::title_case;

pub const ATTRACTION_LIMIT: usize = 20;
pub const ATTRACTION_RADIUS_M: u32 = 8000;
pub const PLACEHOLDER_IMAGE: &str = "/static/placeholder.jpg";

const ATTRACTION_CATEGORY: &str = "tourism.attraction";
const UNKNOWN_PLACE: &str = "Unknown Place";
const NO_ADDRESS: &str = "No address";

#[derive(Clone)]
pub struct AttractionService {
    http_client: Client,
    geoapify_url: String,
    api_key: Option<String>,
}

impl AttractionService {
    pub fn new(config: &AppConfig, http_client: Client) -> Self {
        Self {
            http_client,
            geoapify_url: config.geoapify_url.clone(),
            api_key: config.geoapify_api_key.clone(),
        }
    }

    /// Attractions within `radius_m` of the destination, without images.
    ///
    /// An absent coordinate, a missing key or a failed request all give an
    /// empty list, which sends the caller down the fallback path.
    pub async fn collect(
        &self,
        destination: &Coordinate,
        limit: usize,
        radius_m: u32,
    ) -> Vec<Attraction> {
        let Some((lat, lon)) = destination.pair() else {
            log::info!("Destination has no coordinates, skipping attraction lookup");
            return Vec::new();
        };

        match self.fetch_attractions(lat, lon, limit, radius_m).await {
            Ok(attractions) => {
                log::info!("Found {} attractions near ({:.4}, {:.4})", attractions.len(), lat, lon);
                attractions
            }
            Err(FetchError::MissingKey(name)) => {
                log::info!("{} not configured, skipping attraction lookup", name);
                Vec::new()
            }
            Err(e) => {
                log::warn!("Attraction lookup failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn fetch_attractions(
        &self,
        lat: f64,
        lon: f64,
        limit: usize,
        radius_m: u32,
    ) -> Result<Vec<Attraction>, FetchError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(FetchError::MissingKey("GEOAPIFY_API_KEY"))?;

        let url = endpoint(&self.geoapify_url, "v2/places");
        let filter = format!("circle:{},{},{}", lon, lat, radius_m);
        let limit = limit.to_string();

        let collection: FeatureCollection = get_json(
            &self.http_client,
            &url,
            &[
                ("categories", ATTRACTION_CATEGORY),
                ("filter", filter.as_str()),
                ("limit", limit.as_str()),
                ("apiKey", api_key),
            ],
        )
        .await?;

        Ok(collection
            .features
            .into_iter()
            .map(attraction_from_feature)
            .collect())
    }
}

pub fn attraction_from_feature(feature: Feature) -> Attraction {
    let coordinate = feature.coordinate().unwrap_or_default();
    let properties = feature.properties;

    Attraction {
        name: properties
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
        address: properties
            .formatted
            .filter(|address| !address.trim().is_empty())
            .unwrap_or_else(|| NO_ADDRESS.to_string()),
        coordinate,
        image_url: None,
    }
}

/// Placeholder attractions for a destination with no live results.
///
/// Photos are looked up before shuffling, so each name keeps its own image;
/// only the order varies between calls.
pub async fn generate_fallback(
    images: &ImageService,
    destination: &str,
    coordinate: &Coordinate,
    budget: Budget,
) -> Vec<Attraction> {
    let categories = budget.fallback_categories();

    let photos = if images.is_enabled() {
        join_all(categories.iter().map(|category| {
            let query = format!("{} {} travel", destination, category);
            async move { images.search(&query).await }
        }))
        .await
    } else {
        vec![None; categories.len()]
    };

    let mut attractions = build_fallback_attractions(coordinate, budget, photos);
    attractions.shuffle(&mut rand::thread_rng());
    attractions
}

/// One attraction per budget category, all sharing the destination coordinate.
/// Missing photos become [`PLACEHOLDER_IMAGE`].
pub fn build_fallback_attractions(
    coordinate: &Coordinate,
    budget: Budget,
    photos: Vec<Option<String>>,
) -> Vec<Attraction> {
    budget
        .fallback_categories()
        .iter()
        .zip(photos.into_iter().chain(std::iter::repeat(None)))
        .map(|(category, photo)| Attraction {
            name: title_case(category),
            address: format!("Popular spot for {}-budget travelers", budget),
            coordinate: *coordinate,
            image_url: Some(photo.unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())),
        })
        .collect()
}
