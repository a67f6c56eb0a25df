use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::models::coordinate::parse_degrees;
use crate::models::emergency::{SosRequest, SosResponse};
use crate::services::emergency_service::EmergencyServiceFinder;

/*
    /get_sos and /api/get_sos
*/
pub async fn get_sos(finder: web::Data<EmergencyServiceFinder>, body: web::Bytes) -> impl Responder {
    let Some((lat, lon)) = requested_position(&body) else {
        return HttpResponse::BadRequest()
            .json(json!({ "error": "Latitude and longitude are required" }));
    };

    let services = finder.find_sos(lat, lon).await;
    HttpResponse::Ok().json(SosResponse { services })
}

/// Both values must be present, numeric and non-zero.
fn requested_position(body: &[u8]) -> Option<(f64, f64)> {
    let request: SosRequest = serde_json::from_slice(body).ok()?;

    let lat = parse_degrees(&request.lat).filter(|lat| *lat != 0.0)?;
    let lon = parse_degrees(&request.lon).filter(|lon| *lon != 0.0)?;
    Some((lat, lon))
}
