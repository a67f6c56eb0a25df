use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A resolved point, or a pair of nulls when a lookup could not place it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    pub fn absent() -> Self {
        Self::default()
    }

    /// Builds a coordinate from a GeoJSON `[lon, lat]` position.
    pub fn from_position(position: &[f64]) -> Self {
        match position {
            [lon, lat, ..] => Self::new(*lat, *lon),
            _ => Self::absent(),
        }
    }

    /// Returns `(lat, lon)` only when both halves are present.
    pub fn pair(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.pair().is_some()
    }
}

/// Reads a degree value that upstream APIs send either as a JSON number or a string.
pub fn parse_degrees(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
    .filter(|degrees| degrees.is_finite())
}
