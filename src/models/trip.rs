use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{
    attraction::DayPlan, coordinate::Coordinate, emergency::EmergencyService,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Budget {
    Low,
    #[default]
    Medium,
    High,
}

impl Budget {
    /// Case-insensitive; anything unrecognised is treated as a medium budget.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "low" => Budget::Low,
            "high" => Budget::High,
            _ => Budget::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Budget::Low => "low",
            Budget::Medium => "medium",
            Budget::High => "high",
        }
    }

    /// Rough daily spend in rupees.
    pub fn approx_daily_spend(&self) -> u32 {
        match self {
            Budget::Low => 1500,
            Budget::Medium => 3500,
            Budget::High => 7000,
        }
    }

    /// Generic place kinds used when no real attractions could be found.
    pub fn fallback_categories(&self) -> &'static [&'static str] {
        match self {
            Budget::Low => &[
                "park",
                "market",
                "museum",
                "temple",
                "street food",
                "public garden",
            ],
            Budget::Medium => &[
                "restaurant",
                "art gallery",
                "shopping mall",
                "beach",
                "zoo",
                "lake",
            ],
            Budget::High => &[
                "luxury hotel",
                "fine dining",
                "private tour",
                "cruise",
                "helicopter ride",
            ],
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw `/plan_trip` form. Every field is optional on the wire and
/// normalised by [`TripForm::into_request`].
#[derive(Debug, Default, Deserialize)]
pub struct TripForm {
    pub from_location: Option<String>,
    pub destination: Option<String>,
    pub budget: Option<String>,
    pub trip_type: Option<String>,
    pub preferences: Option<String>,
    pub days: Option<String>,
}

#[derive(Debug)]
pub enum TripFormError {
    MissingDestination,
}

impl fmt::Display for TripFormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripFormError::MissingDestination => write!(f, "Destination is required"),
        }
    }
}

impl std::error::Error for TripFormError {}

impl TripForm {
    pub fn into_request(self) -> Result<TripRequest, TripFormError> {
        let destination = non_blank(self.destination).ok_or(TripFormError::MissingDestination)?;

        Ok(TripRequest {
            origin: non_blank(self.from_location).unwrap_or_default(),
            destination,
            budget: self
                .budget
                .as_deref()
                .map(Budget::parse)
                .unwrap_or_default(),
            trip_type: non_blank(self.trip_type),
            preferences: non_blank(self.preferences),
            days: parse_days(self.days.as_deref()),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Longest trip the planner will lay out.
pub const MAX_TRIP_DAYS: u32 = 30;

/// Non-numeric, missing and non-positive values all mean a one-day trip.
/// Longer trips are capped at [`MAX_TRIP_DAYS`].
pub fn parse_days(value: Option<&str>) -> u32 {
    let days = match value.map(str::trim) {
        Some(v) if !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()) => {
            // Too large for u32 is still a number, just a long one
            v.parse::<u32>().unwrap_or(u32::MAX)
        }
        _ => return 1,
    };

    days.clamp(1, MAX_TRIP_DAYS)
}

#[derive(Debug, Clone)]
pub struct TripRequest {
    pub origin: String,
    pub destination: String,
    pub budget: Budget,
    pub trip_type: Option<String>,
    pub preferences: Option<String>,
    pub days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPlan {
    pub origin: String,
    pub destination: String,
    pub budget: Budget,
    pub trip_type: Option<String>,
    pub preferences: Option<String>,
    pub days: u32,
    pub destination_coordinate: Coordinate,
    pub origin_coordinate: Coordinate,
    pub daily_plan: Vec<DayPlan>,
    pub nearby_services: Vec<EmergencyService>,
}

/// Planned-trip history entry stored per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub destination: String,
    pub user_id: ObjectId,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_parse_is_lenient() {
        assert_eq!(Budget::parse("LOW"), Budget::Low);
        assert_eq!(Budget::parse(" high "), Budget::High);
        assert_eq!(Budget::parse("luxury"), Budget::Medium);
        assert_eq!(Budget::parse(""), Budget::Medium);
    }

    #[test]
    fn test_fallback_category_counts() {
        assert_eq!(Budget::Low.fallback_categories().len(), 6);
        assert_eq!(Budget::Medium.fallback_categories().len(), 6);
        assert_eq!(Budget::High.fallback_categories().len(), 5);
    }

    #[test]
    fn test_parse_days_defaults_to_one() {
        assert_eq!(parse_days(Some("3")), 3);
        assert_eq!(parse_days(Some("three")), 1);
        assert_eq!(parse_days(Some("0")), 1);
        assert_eq!(parse_days(Some("-2")), 1);
        assert_eq!(parse_days(Some("")), 1);
        assert_eq!(parse_days(None), 1);
    }

    #[test]
    fn test_parse_days_is_capped() {
        assert_eq!(parse_days(Some("30")), 30);
        assert_eq!(parse_days(Some("31")), MAX_TRIP_DAYS);
        assert_eq!(parse_days(Some("4294967295")), MAX_TRIP_DAYS);
        assert_eq!(parse_days(Some("99999999999999999999")), MAX_TRIP_DAYS);
    }

    #[test]
    fn test_form_requires_destination() {
        let form = TripForm {
            from_location: Some("Delhi".to_string()),
            destination: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            form.into_request(),
            Err(TripFormError::MissingDestination)
        ));
    }

    #[test]
    fn test_form_normalisation() {
        let form = TripForm {
            from_location: None,
            destination: Some(" Goa ".to_string()),
            budget: Some("High".to_string()),
            trip_type: Some("".to_string()),
            preferences: Some("beaches".to_string()),
            days: Some("4".to_string()),
        };
        let request = form.into_request().unwrap();

        assert_eq!(request.origin, "");
        assert_eq!(request.destination, "Goa");
        assert_eq!(request.budget, Budget::High);
        assert_eq!(request.trip_type, None);
        assert_eq!(request.preferences.as_deref(), Some("beaches"));
        assert_eq!(request.days, 4);
    }
}
