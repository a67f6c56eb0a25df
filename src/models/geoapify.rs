//! Wire types for Geoapify FeatureCollection responses.
//!
//! Every property is optional so that partial features still deserialize;
//! callers decide which defaults apply.

use serde::Deserialize;

use crate::models::coordinate::Coordinate;

#[derive(Debug, Default, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: PlaceProperties,
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaceProperties {
    pub name: Option<String>,
    pub formatted: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(rename = "contact:phone")]
    pub contact_phone: Option<String>,
    pub phone: Option<String>,
    pub contact: Option<Contact>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Contact {
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

impl Feature {
    /// `None` when the feature carries no usable `[lon, lat]` position.
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.geometry
            .as_ref()
            .map(|geometry| Coordinate::from_position(&geometry.coordinates))
            .filter(Coordinate::is_resolved)
    }
}

impl PlaceProperties {
    /// First non-empty phone number among the fields Geoapify uses for it.
    pub fn phone_number(&self) -> Option<&str> {
        [
            self.contact_phone.as_deref(),
            self.phone.as_deref(),
            self.contact.as_ref().and_then(|c| c.phone.as_deref()),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|phone| !phone.is_empty())
    }
}
