pub mod attraction_service;
pub mod emergency_service;
pub mod geocoding_service;
pub mod http;
pub mod image_service;
pub mod itinerary_service;
pub mod text;
pub mod trip_planner_service;
