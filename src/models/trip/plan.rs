use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::request::{Budget, Pace, TripPurpose, TripType};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Activity {
    pub activity_name: String,
    pub estimated_duration: String,
    pub location: String,
    pub route_information: String,
}

/// At most one activity per part of the day.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DayActivities {
    pub morning: Option<Activity>,
    pub afternoon: Option<Activity>,
    pub evening: Option<Activity>,
}

impl DayActivities {
    pub fn slots(&self) -> [(&'static str, Option<&Activity>); 3] {
        [
            ("morning", self.morning.as_ref()),
            ("afternoon", self.afternoon.as_ref()),
            ("evening", self.evening.as_ref()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ItineraryDay {
    pub date: String,
    pub activities: DayActivities,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TravelTip {
    Plain { text: String },
    Structured { title: String, body: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DiningOption {
    Plain {
        text: String,
    },
    Structured {
        name: String,
        cuisine: String,
        #[serde(rename = "priceRange")]
        price_range: String,
    },
}

/// Hotel or flight suggestion.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recommendation {
    pub name: String,
    pub pricing_details: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reservation {
    pub attraction_name: String,
    pub booking_link: String,
    pub recommended_timeframe: String,
    pub estimated_cost: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalEvent {
    pub event_name: String,
    pub date: String,
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    #[default]
    Completed,
}

/// What survives parsing and sanitizing of a generation response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedPlan {
    pub itinerary: Vec<ItineraryDay>,
    pub travel_tips: Vec<TravelTip>,
    pub hotel_recommendations: Vec<Recommendation>,
    pub flight_recommendations: Vec<Recommendation>,
    pub dining_options: Vec<DiningOption>,
    pub reservations: Vec<Reservation>,
    pub local_events: Vec<LocalEvent>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlan {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub destination: String,
    pub date: DateTime<Utc>,
    pub duration: u32,
    pub user_location: String,
    pub budget: Budget,
    pub visit_nearby: bool,
    pub pace: Pace,
    pub trip_type: TripType,
    pub trip_purpose: TripPurpose,
    pub user_id: Option<String>,
    pub itinerary: Vec<ItineraryDay>,
    pub travel_tips: Vec<TravelTip>,
    pub hotel_recommendations: Vec<Recommendation>,
    pub flight_recommendations: Vec<Recommendation>,
    pub dining_options: Vec<DiningOption>,
    pub reservations: Vec<Reservation>,
    pub local_events: Vec<LocalEvent>,
    #[serde(default)]
    pub invited_users: Vec<String>,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}
