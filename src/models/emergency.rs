use serde::{Deserialize, Serialize};

use crate::models::coordinate::Coordinate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyService {
    #[serde(rename = "type")]
    pub service_type: String,
    pub name: String,
    pub address: String,
    pub contact: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

/// Reduced record returned by the SOS endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SosService {
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct SosRequest {
    #[serde(default)]
    pub lat: serde_json::Value,
    #[serde(default)]
    pub lon: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SosResponse {
    pub services: Vec<SosService>,
}
