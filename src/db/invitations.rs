use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{IndexOptions, ReturnDocument},
    Client, Collection, IndexModel,
};
use std::time::Duration;

use super::{mongo::INVITATIONS, StoreError};
use crate::models::{
    invitation::{Invitation, InvitationDocument, InviteStatus},
    trip::document::parse_object_id,
};

#[async_trait]
pub trait InvitationStore: Send + Sync {
    async fn insert(&self, invite: Invitation) -> Result<Invitation, StoreError>;

    async fn find_pending(
        &self,
        trip_id: &str,
        inviter_id: &str,
        invited_user_id: &str,
    ) -> Result<Option<Invitation>, StoreError>;

    async fn list_for_invitee(
        &self,
        invited_user_id: &str,
        status: InviteStatus,
    ) -> Result<Vec<Invitation>, StoreError>;

    /// Moves a pending invite addressed to `invited_user_id` to `status`.
    /// `None` when there is no such pending invite.
    async fn respond(
        &self,
        invite_id: &str,
        invited_user_id: &str,
        status: InviteStatus,
    ) -> Result<Option<Invitation>, StoreError>;
}

pub struct MongoInvitationStore {
    collection: Collection<InvitationDocument>,
}

impl MongoInvitationStore {
    pub fn new(client: &Client, database: &str) -> Self {
        Self {
            collection: client.database(database).collection(INVITATIONS),
        }
    }

    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let ttl = IndexModel::builder()
            .keys(doc! { "expiresAt": 1 })
            .options(
                IndexOptions::builder()
                    .expire_after(Duration::from_secs(0))
                    .build(),
            )
            .build();

        self.collection.create_indexes([pending_invite_index(), ttl]).await?;
        Ok(())
    }
}

/// One pending invite per trip, inviter and invitee. Answered invites may repeat.
fn pending_invite_index() -> IndexModel {
    IndexModel::builder()
        .keys(doc! { "tripId": 1, "inviterId": 1, "invitedUserId": 1 })
        .options(
            IndexOptions::builder()
                .unique(true)
                .partial_filter_expression(doc! { "status": InviteStatus::Pending.as_str() })
                .name("pending_invite_unique".to_string())
                .build(),
        )
        .build()
}

#[async_trait]
impl InvitationStore for MongoInvitationStore {
    async fn insert(&self, invite: Invitation) -> Result<Invitation, StoreError> {
        let mut document = InvitationDocument::try_from(invite)?;
        let result = self.collection.insert_one(&document).await?;
        document.id = result.inserted_id.as_object_id();
        Ok(document.into())
    }

    async fn find_pending(
        &self,
        trip_id: &str,
        inviter_id: &str,
        invited_user_id: &str,
    ) -> Result<Option<Invitation>, StoreError> {
        let filter = doc! {
            "tripId": parse_object_id(trip_id)?,
            "inviterId": parse_object_id(inviter_id)?,
            "invitedUserId": parse_object_id(invited_user_id)?,
            "status": InviteStatus::Pending.as_str(),
        };
        let found = self.collection.find_one(filter).await?;
        Ok(found.map(Invitation::from))
    }

    async fn list_for_invitee(
        &self,
        invited_user_id: &str,
        status: InviteStatus,
    ) -> Result<Vec<Invitation>, StoreError> {
        let filter = doc! {
            "invitedUserId": parse_object_id(invited_user_id)?,
            "status": status.as_str(),
        };
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .await?;
        let documents: Vec<InvitationDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Invitation::from).collect())
    }

    async fn respond(
        &self,
        invite_id: &str,
        invited_user_id: &str,
        status: InviteStatus,
    ) -> Result<Option<Invitation>, StoreError> {
        let Ok(invite_id) = parse_object_id(invite_id) else {
            return Ok(None);
        };
        let filter = doc! {
            "_id": invite_id,
            "invitedUserId": parse_object_id(invited_user_id)?,
            "status": InviteStatus::Pending.as_str(),
        };
        let updated = self
            .collection
            .find_one_and_update(filter, doc! { "$set": { "status": status.as_str() } })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated.map(Invitation::from))
    }
}
