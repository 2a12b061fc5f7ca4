use chrono::{DateTime, Duration, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::trip::ItineraryDay;
use crate::db::StoreError;
use crate::models::trip::document::parse_object_id;

pub const INVITE_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Rejected,
}

impl InviteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteStatus::Pending => "pending",
            InviteStatus::Accepted => "accepted",
            InviteStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteInput {
    pub trip_id: String,
    pub invited_user_email: String,
}

#[derive(Debug, Deserialize)]
pub struct InviteResponseInput {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub trip_id: String,
    pub inviter_id: String,
    pub invited_user_id: String,
    pub status: InviteStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Invitation {
    pub fn pending(
        trip_id: String,
        inviter_id: String,
        invited_user_id: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            trip_id,
            inviter_id,
            invited_user_id,
            status: InviteStatus::Pending,
            created_at: now,
            expires_at: now + Duration::days(INVITE_TTL_DAYS),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub destination: String,
    pub date: DateTime<Utc>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingInvite {
    #[serde(flatten)]
    pub invite: Invitation,
    pub trip: Option<TripSummary>,
    pub inviter_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitedTrip {
    #[serde(rename = "_id")]
    pub id: String,
    pub destination: String,
    pub date: DateTime<Utc>,
    pub inviter_name: String,
    pub itinerary: Vec<ItineraryDay>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub trip_id: ObjectId,
    pub inviter_id: ObjectId,
    pub invited_user_id: ObjectId,
    pub status: InviteStatus,
    pub created_at: bson::DateTime,
    pub expires_at: bson::DateTime,
}

impl TryFrom<Invitation> for InvitationDocument {
    type Error = StoreError;

    fn try_from(invite: Invitation) -> Result<Self, Self::Error> {
        Ok(Self {
            id: invite.id.as_deref().map(parse_object_id).transpose()?,
            trip_id: parse_object_id(&invite.trip_id)?,
            inviter_id: parse_object_id(&invite.inviter_id)?,
            invited_user_id: parse_object_id(&invite.invited_user_id)?,
            status: invite.status,
            created_at: bson::DateTime::from_chrono(invite.created_at),
            expires_at: bson::DateTime::from_chrono(invite.expires_at),
        })
    }
}

impl From<InvitationDocument> for Invitation {
    fn from(doc: InvitationDocument) -> Self {
        Self {
            id: doc.id.map(|id| id.to_hex()),
            trip_id: doc.trip_id.to_hex(),
            inviter_id: doc.inviter_id.to_hex(),
            invited_user_id: doc.invited_user_id.to_hex(),
            status: doc.status,
            created_at: doc.created_at.to_chrono(),
            expires_at: doc.expires_at.to_chrono(),
        }
    }
}
