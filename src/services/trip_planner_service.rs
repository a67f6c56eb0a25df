//! Trip Planner Service
//!
//! Turns a trip request into a complete plan:
//!
//! 1. Geocode origin and destination (Nominatim).
//! 2. Attraction branch: collect nearby attractions, attach photos, fall back
//!    to generic budget places when nothing was found, split across days.
//! 3. Emergency branch: geocode the destination with Geoapify and list nearby
//!    emergency services.
//!
//! Both branches run concurrently. No upstream failure aborts the plan; it
//! only shows up as absent coordinates, missing photos or placeholder places.

use reqwest::Client;

use crate::config::AppConfig;
use crate::models::attraction::DayPlan;
use crate::models::coordinate::Coordinate;
use crate::models::emergency::EmergencyService;
use crate::models::trip::{TripPlan, TripRequest};
use crate::services::attraction_service::{
    generate_fallback, AttractionService, ATTRACTION_LIMIT, ATTRACTION_RADIUS_M,
};
use crate::services::emergency_service::{
    EmergencyServiceFinder, EMERGENCY_LIMIT, EMERGENCY_RADIUS_M,
};
use crate::services::geocoding_service::GeocodingService;
use crate::services::image_service::ImageService;
use crate::services::itinerary_service::ItineraryService;

#[derive(Clone)]
pub struct TripPlannerService {
    geocoder: GeocodingService,
    attractions: AttractionService,
    images: ImageService,
    emergency: EmergencyServiceFinder,
}

impl TripPlannerService {
    pub fn new(config: &AppConfig, http_client: Client) -> Self {
        Self {
            geocoder: GeocodingService::new(config, http_client.clone()),
            attractions: AttractionService::new(config, http_client.clone()),
            images: ImageService::new(config, http_client.clone()),
            emergency: EmergencyServiceFinder::new(config, http_client),
        }
    }

    pub async fn plan(&self, request: &TripRequest) -> TripPlan {
        log::info!(
            "Planning {}-day {} trip from '{}' to '{}'",
            request.days,
            request.budget,
            request.origin,
            request.destination
        );

        let (origin_coordinate, destination_coordinate) = futures::join!(
            self.geocoder.resolve(&request.origin),
            self.geocoder.resolve(&request.destination),
        );

        let (daily_plan, nearby_services) = futures::join!(
            self.build_daily_plan(request, &destination_coordinate),
            self.find_nearby_services(&request.destination),
        );

        TripPlan {
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            budget: request.budget,
            trip_type: request.trip_type.clone(),
            preferences: request.preferences.clone(),
            days: request.days,
            destination_coordinate,
            origin_coordinate,
            daily_plan,
            nearby_services,
        }
    }

    async fn build_daily_plan(
        &self,
        request: &TripRequest,
        destination_coordinate: &Coordinate,
    ) -> Vec<DayPlan> {
        let attractions = self
            .attractions
            .collect(destination_coordinate, ATTRACTION_LIMIT, ATTRACTION_RADIUS_M)
            .await;
        let mut attractions = self.images.enrich(attractions).await;

        if attractions.is_empty() {
            log::info!(
                "No attractions found for '{}', using {}-budget suggestions",
                request.destination,
                request.budget
            );
            attractions = generate_fallback(
                &self.images,
                &request.destination,
                destination_coordinate,
                request.budget,
            )
            .await;
        }

        ItineraryService::partition(&attractions, request.days, request.budget)
    }

    async fn find_nearby_services(&self, destination: &str) -> Vec<EmergencyService> {
        let coordinate = self.geocoder.resolve_with_geoapify(destination).await;
        self.emergency
            .find(&coordinate, EMERGENCY_RADIUS_M, EMERGENCY_LIMIT)
            .await
    }
}
