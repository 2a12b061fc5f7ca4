use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use super::plan::{
    DiningOption, ItineraryDay, LocalEvent, Recommendation, Reservation, TravelTip, TripPlan,
    TripStatus,
};
use super::request::{Budget, Pace, TripPurpose, TripType};
use crate::db::StoreError;

/// Storage shape of a [`TripPlan`]: ObjectId references and BSON dates so the
/// TTL index on `expiresAt` applies.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlanDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub destination: String,
    pub date: DateTime,
    pub duration: u32,
    pub user_location: String,
    pub budget: Budget,
    pub visit_nearby: bool,
    pub pace: Pace,
    pub trip_type: TripType,
    pub trip_purpose: TripPurpose,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<ObjectId>,
    pub itinerary: Vec<ItineraryDay>,
    pub travel_tips: Vec<TravelTip>,
    pub hotel_recommendations: Vec<Recommendation>,
    pub flight_recommendations: Vec<Recommendation>,
    pub dining_options: Vec<DiningOption>,
    pub reservations: Vec<Reservation>,
    pub local_events: Vec<LocalEvent>,
    #[serde(default)]
    pub invited_users: Vec<ObjectId>,
    pub status: TripStatus,
    pub created_at: DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime>,
}

pub fn parse_object_id(raw: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(raw).map_err(|_| StoreError::InvalidId(raw.to_string()))
}

impl TryFrom<TripPlan> for TripPlanDocument {
    type Error = StoreError;

    fn try_from(plan: TripPlan) -> Result<Self, Self::Error> {
        Ok(Self {
            id: plan.id.as_deref().map(parse_object_id).transpose()?,
            destination: plan.destination,
            date: DateTime::from_chrono(plan.date),
            duration: plan.duration,
            user_location: plan.user_location,
            budget: plan.budget,
            visit_nearby: plan.visit_nearby,
            pace: plan.pace,
            trip_type: plan.trip_type,
            trip_purpose: plan.trip_purpose,
            user_id: plan.user_id.as_deref().map(parse_object_id).transpose()?,
            itinerary: plan.itinerary,
            travel_tips: plan.travel_tips,
            hotel_recommendations: plan.hotel_recommendations,
            flight_recommendations: plan.flight_recommendations,
            dining_options: plan.dining_options,
            reservations: plan.reservations,
            local_events: plan.local_events,
            invited_users: plan
                .invited_users
                .iter()
                .map(|id| parse_object_id(id))
                .collect::<Result<_, _>>()?,
            status: plan.status,
            created_at: DateTime::from_chrono(plan.created_at),
            expires_at: plan.expires_at.map(DateTime::from_chrono),
        })
    }
}

impl From<TripPlanDocument> for TripPlan {
    fn from(doc: TripPlanDocument) -> Self {
        Self {
            id: doc.id.map(|id| id.to_hex()),
            destination: doc.destination,
            date: doc.date.to_chrono(),
            duration: doc.duration,
            user_location: doc.user_location,
            budget: doc.budget,
            visit_nearby: doc.visit_nearby,
            pace: doc.pace,
            trip_type: doc.trip_type,
            trip_purpose: doc.trip_purpose,
            user_id: doc.user_id.map(|id| id.to_hex()),
            itinerary: doc.itinerary,
            travel_tips: doc.travel_tips,
            hotel_recommendations: doc.hotel_recommendations,
            flight_recommendations: doc.flight_recommendations,
            dining_options: doc.dining_options,
            reservations: doc.reservations,
            local_events: doc.local_events,
            invited_users: doc.invited_users.iter().map(|id| id.to_hex()).collect(),
            status: doc.status,
            created_at: doc.created_at.to_chrono(),
            expires_at: doc.expires_at.map(|at| at.to_chrono()),
        }
    }
}
