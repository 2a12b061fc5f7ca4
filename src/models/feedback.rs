use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::db::StoreError;
use crate::error::ApiError;
use crate::models::trip::document::parse_object_id;

const UNKNOWN_DESTINATION: &str = "Unknown Destination";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackInput {
    pub user_name: Option<String>,
    pub user_location: Option<String>,
    pub destination: Option<String>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
    pub trip_id: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub user_name: String,
    pub user_location: String,
    pub destination: String,
    pub rating: u8,
    pub comment: String,
    pub trip_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FeedbackInput {
    pub fn into_feedback(self, now: DateTime<Utc>) -> Result<Feedback, ApiError> {
        let user_name = required(self.user_name, "User name is required")?;
        let comment = required(self.comment, "Comment is required")?;
        let rating = self
            .rating
            .ok_or_else(|| ApiError::Validation("Rating is required".to_string()))?;
        let rating = u8::try_from(rating)
            .ok()
            .filter(|r| (1..=5).contains(r))
            .ok_or_else(|| ApiError::Validation("Rating must be between 1 and 5".to_string()))?;

        let trip_id = match self.trip_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => {
                ObjectId::parse_str(id.trim())
                    .map_err(|_| ApiError::Validation("tripId is not a valid id".to_string()))?;
                Some(id.trim().to_string())
            }
            None => None,
        };

        Ok(Feedback {
            id: None,
            user_name,
            user_location: self.user_location.unwrap_or_default(),
            destination: self
                .destination
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_DESTINATION.to_string()),
            rating,
            comment,
            trip_id,
            created_at: now,
        })
    }
}

fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation(message.to_string()))
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_name: String,
    pub user_location: String,
    pub destination: String,
    pub rating: i32,
    pub comment: String,
    pub trip_id: Option<ObjectId>,
    pub created_at: bson::DateTime,
}

impl TryFrom<Feedback> for FeedbackDocument {
    type Error = StoreError;

    fn try_from(feedback: Feedback) -> Result<Self, Self::Error> {
        Ok(Self {
            id: feedback.id.as_deref().map(parse_object_id).transpose()?,
            user_name: feedback.user_name,
            user_location: feedback.user_location,
            destination: feedback.destination,
            rating: i32::from(feedback.rating),
            comment: feedback.comment,
            trip_id: feedback.trip_id.as_deref().map(parse_object_id).transpose()?,
            created_at: bson::DateTime::from_chrono(feedback.created_at),
        })
    }
}

impl From<FeedbackDocument> for Feedback {
    fn from(doc: FeedbackDocument) -> Self {
        Self {
            id: doc.id.map(|id| id.to_hex()),
            user_name: doc.user_name,
            user_location: doc.user_location,
            destination: doc.destination,
            rating: u8::try_from(doc.rating.clamp(1, 5)).unwrap_or(1),
            comment: doc.comment,
            trip_id: doc.trip_id.map(|id| id.to_hex()),
            created_at: doc.created_at.to_chrono(),
        }
    }
}
