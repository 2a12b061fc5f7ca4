use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use crate::error::ApiError;

/// Longest trip a single plan may cover.
pub const MAX_DURATION_DAYS: u32 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum Pace {
    Relaxed,
    #[default]
    Moderate,
    #[serde(rename = "High-Energy")]
    HighEnergy,
    Intense,
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Pace::Relaxed => "Relaxed",
            Pace::Moderate => "Moderate",
            Pace::HighEnergy => "High-Energy",
            Pace::Intense => "Intense",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum TripType {
    #[default]
    Adventure,
    Relaxation,
    #[serde(rename = "Cultural Immersion")]
    CulturalImmersion,
    #[serde(rename = "Foodie Tour")]
    FoodieTour,
    Historical,
    Nature,
    Shopping,
    Beach,
    #[serde(rename = "Winter Sports")]
    WinterSports,
    #[serde(rename = "City Exploration")]
    CityExploration,
    #[serde(rename = "Mixed Experience")]
    MixedExperience,
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TripType::Adventure => "Adventure",
            TripType::Relaxation => "Relaxation",
            TripType::CulturalImmersion => "Cultural Immersion",
            TripType::FoodieTour => "Foodie Tour",
            TripType::Historical => "Historical",
            TripType::Nature => "Nature",
            TripType::Shopping => "Shopping",
            TripType::Beach => "Beach",
            TripType::WinterSports => "Winter Sports",
            TripType::CityExploration => "City Exploration",
            TripType::MixedExperience => "Mixed Experience",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum TripPurpose {
    #[default]
    Vacation,
    #[serde(rename = "Family Trip")]
    FamilyTrip,
    #[serde(rename = "Solo Travel")]
    SoloTravel,
    Honeymoon,
    Anniversary,
    #[serde(rename = "Bachelor/Bachelorette Party")]
    BachelorParty,
    Business,
    #[serde(rename = "Educational Tour")]
    EducationalTour,
    #[serde(rename = "Religious Pilgrimage")]
    ReligiousPilgrimage,
    #[serde(rename = "Sports Event")]
    SportsEvent,
}

impl fmt::Display for TripPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TripPurpose::Vacation => "Vacation",
            TripPurpose::FamilyTrip => "Family Trip",
            TripPurpose::SoloTravel => "Solo Travel",
            TripPurpose::Honeymoon => "Honeymoon",
            TripPurpose::Anniversary => "Anniversary",
            TripPurpose::BachelorParty => "Bachelor/Bachelorette Party",
            TripPurpose::Business => "Business",
            TripPurpose::EducationalTour => "Educational Tour",
            TripPurpose::ReligiousPilgrimage => "Religious Pilgrimage",
            TripPurpose::SportsEvent => "Sports Event",
        };
        f.write_str(label)
    }
}

/// Budgets arrive either as a bare number or as free text ("₹50,000", "mid-range").
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Budget {
    Amount(f64),
    Text(String),
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Budget::Amount(amount) => write!(f, "{}", amount),
            Budget::Text(text) => f.write_str(text),
        }
    }
}

/// Raw `POST /createtrip` body. Everything is optional here so that a missing
/// field becomes a validation message rather than a serde error.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequestInput {
    pub destination: Option<String>,
    pub date: Option<String>,
    // HTML forms post the day count as a string.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub duration: Option<i64>,
    pub user_location: Option<String>,
    pub budget: Option<Budget>,
    #[serde(default)]
    pub visit_nearby: bool,
    pub user_id: Option<String>,
    pub pace: Option<Pace>,
    pub trip_type: Option<TripType>,
    pub trip_purpose: Option<TripPurpose>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub destination: String,
    pub start_date: NaiveDate,
    pub duration_days: u32,
    pub origin_location: String,
    pub budget: Budget,
    pub visit_nearby: bool,
    pub pace: Pace,
    pub trip_type: TripType,
    pub trip_purpose: TripPurpose,
    pub owner_id: Option<String>,
}

impl TripRequest {
    pub fn end_date(&self) -> NaiveDate {
        self.start_date
            .checked_add_signed(Duration::days(i64::from(self.duration_days)))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl TryFrom<TripRequestInput> for TripRequest {
    type Error = ApiError;

    fn try_from(input: TripRequestInput) -> Result<Self, Self::Error> {
        let mut missing = Vec::new();
        let destination = non_blank(input.destination, "destination", &mut missing);
        let origin_location = non_blank(input.user_location, "userLocation", &mut missing);
        let date = non_blank(input.date, "date", &mut missing);
        if input.duration.is_none() {
            missing.push("duration");
        }
        let budget = match input.budget {
            Some(Budget::Text(text)) if text.trim().is_empty() => {
                missing.push("budget");
                None
            }
            Some(budget) => Some(budget),
            None => {
                missing.push("budget");
                None
            }
        };

        if !missing.is_empty() {
            return Err(ApiError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let duration = input.duration.unwrap_or_default();
        let duration_days = u32::try_from(duration)
            .ok()
            .filter(|days| (1..=MAX_DURATION_DAYS).contains(days))
            .ok_or_else(|| {
                ApiError::Validation(format!(
                    "duration must be between 1 and {} days",
                    MAX_DURATION_DAYS
                ))
            })?;

        let start_date = parse_start_date(&date.unwrap_or_default())?;
        if start_date
            .checked_add_signed(Duration::days(i64::from(duration_days)))
            .is_none()
        {
            return Err(ApiError::Validation(
                "date and duration fall outside the supported calendar".to_string(),
            ));
        }

        let owner_id = match input.user_id.map(|id| id.trim().to_string()) {
            Some(id) if id.is_empty() => None,
            Some(id) => {
                ObjectId::parse_str(&id)
                    .map_err(|_| ApiError::Validation("userId is not a valid id".to_string()))?;
                Some(id)
            }
            None => None,
        };

        Ok(TripRequest {
            destination: destination.unwrap_or_default(),
            start_date,
            duration_days,
            origin_location: origin_location.unwrap_or_default(),
            budget: budget.unwrap_or(Budget::Amount(0.0)),
            visit_nearby: input.visit_nearby,
            pace: input.pace.unwrap_or_default(),
            trip_type: input.trip_type.unwrap_or_default(),
            trip_purpose: input.trip_purpose.unwrap_or_default(),
            owner_id,
        })
    }
}

fn non_blank(
    value: Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            missing.push(name);
            None
        }
    }
}

/// Accepts a plain calendar date or a full RFC 3339 timestamp.
pub fn parse_start_date(raw: &str) -> Result<NaiveDate, ApiError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc).date_naive()))
        .map_err(|_| ApiError::Validation(format!("date '{}' is not a valid date", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: serde_json::Value) -> TripRequestInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_full_request_is_accepted() {
        let request = TripRequest::try_from(input(json!({
            "destination": "Lisbon",
            "date": "2025-06-01",
            "duration": 5,
            "userLocation": "Madrid",
            "budget": 1500,
            "visitNearby": true,
            "userId": "65f1a2b3c4d5e6f708192a3b",
            "pace": "High-Energy",
            "tripType": "Foodie Tour",
            "tripPurpose": "Bachelor/Bachelorette Party"
        })))
        .unwrap();

        assert_eq!(request.start_date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(request.end_date(), NaiveDate::from_ymd_opt(2025, 6, 6).unwrap());
        assert_eq!(request.pace, Pace::HighEnergy);
        assert_eq!(request.trip_type.to_string(), "Foodie Tour");
        assert_eq!(request.budget, Budget::Amount(1500.0));
        assert!(request.owner_id.is_some());
    }

    #[test]
    fn test_missing_fields_are_listed() {
        let err = TripRequest::try_from(input(json!({ "destination": "Rome" }))).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("date"));
        assert!(message.contains("duration"));
        assert!(message.contains("userLocation"));
        assert!(message.contains("budget"));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err = TripRequest::try_from(input(json!({
            "destination": "Rome",
            "date": "2025-06-01",
            "duration": 0,
            "userLocation": "Milan",
            "budget": "cheap"
        })))
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_oversized_duration_rejected() {
        for duration in [json!(366), json!(4_000_000_000_i64), json!("4000000000")] {
            let err = TripRequest::try_from(input(json!({
                "destination": "Rome",
                "date": "2025-06-01",
                "duration": duration,
                "userLocation": "Milan",
                "budget": "cheap"
            })))
            .unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "duration {}", duration);
        }
    }

    #[test]
    fn test_end_date_saturates() {
        let mut request = TripRequest::try_from(input(json!({
            "destination": "Rome",
            "date": "2025-06-01",
            "duration": 3,
            "userLocation": "Milan",
            "budget": "cheap"
        })))
        .unwrap();
        request.start_date = NaiveDate::MAX;
        assert_eq!(request.end_date(), NaiveDate::MAX);
    }

    #[test]
    fn test_defaults_and_rfc3339_date() {
        let request = TripRequest::try_from(input(json!({
            "destination": "Rome",
            "date": "2025-06-01T15:30:00Z",
            "duration": 2,
            "userLocation": "Milan",
            "budget": "mid-range",
            "userId": ""
        })))
        .unwrap();
        assert_eq!(request.start_date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(request.pace, Pace::Moderate);
        assert_eq!(request.trip_purpose, TripPurpose::Vacation);
        assert!(request.owner_id.is_none());
    }

    #[test]
    fn test_duration_accepted_as_string() {
        let request = TripRequest::try_from(input(json!({
            "destination": "Rome",
            "date": "2025-06-01",
            "duration": "3",
            "userLocation": "Milan",
            "budget": 100
        })))
        .unwrap();
        assert_eq!(request.duration_days, 3);
    }

    #[test]
    fn test_bad_owner_id_rejected() {
        let err = TripRequest::try_from(input(json!({
            "destination": "Rome",
            "date": "2025-06-01",
            "duration": 2,
            "userLocation": "Milan",
            "budget": 100,
            "userId": "not-an-id"
        })))
        .unwrap_err();
        assert_eq!(err.to_string(), "userId is not a valid id");
    }
}
