//! Emergency Service Finder
//!
//! Looks up hospitals, clinics, police and fire stations around a point via
//! the Geoapify places API.
//!
//! ## Guarantees
//! - Every entry has a contact: the listed phone number, or the national
//!   helpline for its category.
//! - A completed lookup always contains at least one police and one hospital
//!   entry; generic helpline entries are appended when the area has none.
//! - A failed lookup (transport error, non-2xx, malformed body, missing key)
//!   returns an empty list. The police/hospital guarantee is not applied on
//!   that path.

use reqwest::Client;

use crate::config::AppConfig;
use crate::models::coordinate::Coordinate;
use crate::models::emergency::{EmergencyService, SosService};
use crate::models::geoapify::{Feature, FeatureCollection};
use crate::services::http::{endpoint, get_json, FetchError};
use crate::services::text::title_case;

pub const EMERGENCY_RADIUS_M: u32 = 5000;
pub const EMERGENCY_LIMIT: usize = 10;

const EMERGENCY_CATEGORIES: &str = "healthcare.hospital,healthcare.clinic,police,fire_station";
const SOS_CATEGORIES: &str = "healthcare.hospital,public_service.police";

const POLICE_HELPLINE: &str = "Dial 100";
const MEDICAL_HELPLINE: &str = "Dial 108";
const FIRE_HELPLINE: &str = "Dial 101";
const NO_CONTACT: &str = "Not available";
const DEFAULT_REGION: &str = "India";

#[derive(Clone)]
pub struct EmergencyServiceFinder {
    http_client: Client,
    geoapify_url: String,
    api_key: Option<String>,
}

impl EmergencyServiceFinder {
    pub fn new(config: &AppConfig, http_client: Client) -> Self {
        Self {
            http_client,
            geoapify_url: config.geoapify_url.clone(),
            api_key: config.geoapify_api_key.clone(),
        }
    }

    /// Emergency services within `radius_m` of `coordinate`.
    pub async fn find(
        &self,
        coordinate: &Coordinate,
        radius_m: u32,
        limit: usize,
    ) -> Vec<EmergencyService> {
        match self.fetch_services(coordinate, radius_m, limit).await {
            Ok(mut services) => {
                ensure_essential_services(&mut services, coordinate);
                services
            }
            Err(e) => {
                log::warn!("Emergency service lookup failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Hospitals and police stations near a point, for the SOS endpoint.
    /// No helpline entries are synthesized here.
    pub async fn find_sos(&self, lat: f64, lon: f64) -> Vec<SosService> {
        let result = async {
            let api_key = self.api_key()?;
            let collection =
                self.fetch_places(SOS_CATEGORIES, lat, lon, EMERGENCY_RADIUS_M, EMERGENCY_LIMIT, api_key)
                    .await?;

            Ok::<_, FetchError>(
                collection
                    .features
                    .into_iter()
                    .map(sos_service_from_feature)
                    .collect::<Vec<_>>(),
            )
        }
        .await;

        result.unwrap_or_else(|e| {
            log::warn!("SOS lookup near ({:.4}, {:.4}) failed: {}", lat, lon, e);
            Vec::new()
        })
    }

    async fn fetch_services(
        &self,
        coordinate: &Coordinate,
        radius_m: u32,
        limit: usize,
    ) -> Result<Vec<EmergencyService>, FetchError> {
        let api_key = self.api_key()?;

        // Nothing to search around; the defaults are added by the caller
        let Some((lat, lon)) = coordinate.pair() else {
            return Ok(Vec::new());
        };

        let collection = self
            .fetch_places(EMERGENCY_CATEGORIES, lat, lon, radius_m, limit, api_key)
            .await?;

        collection
            .features
            .into_iter()
            .map(emergency_service_from_feature)
            .collect()
    }

    async fn fetch_places(
        &self,
        categories: &str,
        lat: f64,
        lon: f64,
        radius_m: u32,
        limit: usize,
        api_key: &str,
    ) -> Result<FeatureCollection, FetchError> {
        let url = endpoint(&self.geoapify_url, "v2/places");
        let filter = format!("circle:{},{},{}", lon, lat, radius_m);
        let limit = limit.to_string();

        get_json(
            &self.http_client,
            &url,
            &[
                ("categories", categories),
                ("filter", filter.as_str()),
                ("limit", limit.as_str()),
                ("apiKey", api_key),
            ],
        )
        .await
    }

    fn api_key(&self) -> Result<&str, FetchError> {
        self.api_key
            .as_deref()
            .ok_or(FetchError::MissingKey("GEOAPIFY_API_KEY"))
    }
}

/// A feature without a position makes the whole lookup fail.
pub fn emergency_service_from_feature(feature: Feature) -> Result<EmergencyService, FetchError> {
    let coordinate = feature
        .coordinate()
        .ok_or_else(|| FetchError::Decode("emergency feature without coordinates".to_string()))?;
    let properties = feature.properties;

    let service_type = properties
        .categories
        .first()
        .map(|category| title_case(category))
        .unwrap_or_else(|| "Other".to_string());

    let contact = properties
        .phone_number()
        .map(str::to_string)
        .unwrap_or_else(|| default_contact(&service_type).to_string());

    Ok(EmergencyService {
        name: properties
            .name
            .unwrap_or_else(|| "Unknown Location".to_string()),
        address: properties
            .formatted
            .unwrap_or_else(|| "No address available".to_string()),
        service_type,
        contact,
        coordinate,
    })
}

pub fn sos_service_from_feature(feature: Feature) -> SosService {
    let properties = feature.properties;

    let service_type = properties
        .categories
        .first()
        .and_then(|category| category.rsplit('.').next())
        .map(title_case)
        .unwrap_or_else(|| "Service".to_string());

    SosService {
        name: properties.name.unwrap_or_else(|| "Unknown".to_string()),
        service_type,
        address: properties
            .formatted
            .unwrap_or_else(|| "No address available".to_string()),
    }
}

/// National helpline for a service category.
pub fn default_contact(service_type: &str) -> &'static str {
    let service_type = service_type.to_lowercase();
    if service_type.contains("police") {
        POLICE_HELPLINE
    } else if service_type.contains("hospital") || service_type.contains("clinic") {
        MEDICAL_HELPLINE
    } else if service_type.contains("fire") {
        FIRE_HELPLINE
    } else {
        NO_CONTACT
    }
}

/// Append helpline entries when no police or no hospital entry is present.
pub fn ensure_essential_services(services: &mut Vec<EmergencyService>, coordinate: &Coordinate) {
    if !services.iter().any(|s| s.service_type.contains("Police")) {
        services.push(EmergencyService {
            service_type: "Police Station".to_string(),
            name: "Local Police Helpline".to_string(),
            address: DEFAULT_REGION.to_string(),
            contact: POLICE_HELPLINE.to_string(),
            coordinate: *coordinate,
        });
    }

    if !services.iter().any(|s| s.service_type.contains("Hospital")) {
        services.push(EmergencyService {
            service_type: "Hospital".to_string(),
            name: "Nearest Medical Emergency".to_string(),
            address: DEFAULT_REGION.to_string(),
            contact: MEDICAL_HELPLINE.to_string(),
            coordinate: *coordinate,
        });
    }
}
