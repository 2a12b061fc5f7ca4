use async_trait::async_trait;
use mongodb::{
    bson::{doc, to_document, Bson, Document},
    options::{IndexOptions, ReturnDocument},
    Client, Collection, IndexModel,
};
use std::time::Duration;

use super::{mongo::TRIPS, StoreError};
use crate::models::trip::{document::parse_object_id, TripPlan, TripPlanDocument};

/// Document store for generated trip plans.
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Persists a plan without an owner.
    async fn insert(&self, plan: TripPlan) -> Result<TripPlan, StoreError>;

    /// Atomically swaps the owner's current plan for `plan`, creating one if
    /// the owner has none. At most one plan per owner survives; its id and
    /// `invitedUsers` carry over from the plan it replaces.
    async fn replace_for_owner(&self, owner_id: &str, plan: TripPlan)
        -> Result<TripPlan, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<TripPlan>, StoreError>;

    async fn find_by_owner(&self, owner_id: &str) -> Result<Option<TripPlan>, StoreError>;

    async fn delete_by_owner(&self, owner_id: &str) -> Result<bool, StoreError>;

    /// Set semantics: adding an already invited user is a no-op.
    async fn add_invited_user(&self, trip_id: &str, user_id: &str) -> Result<bool, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

pub struct MongoTripStore {
    client: Client,
    collection: Collection<TripPlanDocument>,
}

impl MongoTripStore {
    pub fn new(client: &Client, database: &str) -> Self {
        Self {
            client: client.clone(),
            collection: client.database(database).collection(TRIPS),
        }
    }

    /// TTL on `expiresAt` plus one plan per owner.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let ttl = IndexModel::builder()
            .keys(doc! { "expiresAt": 1 })
            .options(
                IndexOptions::builder()
                    .expire_after(Duration::from_secs(0))
                    .name("expiresAt_ttl".to_string())
                    .build(),
            )
            .build();
        let owner = IndexModel::builder()
            .keys(doc! { "userId": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .partial_filter_expression(doc! { "userId": { "$type": "objectId" } })
                    .name("userId_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_indexes([ttl, owner]).await?;
        Ok(())
    }
}

/// Overwrites the generated fields of an owner's plan. Invitees are only
/// initialised on insert so accepted invites survive a regeneration.
fn owner_plan_update(document: &TripPlanDocument) -> Result<Document, StoreError> {
    let mut fields = to_document(document)?;
    fields.remove("_id");
    fields.remove("invitedUsers");
    Ok(doc! {
        "$set": fields,
        "$setOnInsert": { "invitedUsers": Bson::Array(Vec::new()) },
    })
}

#[async_trait]
impl TripStore for MongoTripStore {
    async fn insert(&self, plan: TripPlan) -> Result<TripPlan, StoreError> {
        let mut document = TripPlanDocument::try_from(plan)?;
        document.id = None;

        let result = self.collection.insert_one(&document).await?;
        document.id = result.inserted_id.as_object_id();
        Ok(document.into())
    }

    async fn replace_for_owner(
        &self,
        owner_id: &str,
        plan: TripPlan,
    ) -> Result<TripPlan, StoreError> {
        let owner = parse_object_id(owner_id)?;
        let mut document = TripPlanDocument::try_from(plan)?;
        document.id = None;
        document.user_id = Some(owner);

        let saved = self
            .collection
            .find_one_and_update(doc! { "userId": owner }, owner_plan_update(&document)?)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?;

        saved
            .map(TripPlan::from)
            .ok_or_else(|| StoreError::Missing(format!("trip plan for owner {}", owner_id)))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<TripPlan>, StoreError> {
        let Ok(id) = parse_object_id(id) else {
            return Ok(None);
        };
        let found = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(found.map(TripPlan::from))
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Option<TripPlan>, StoreError> {
        let owner = parse_object_id(owner_id)?;
        let found = self.collection.find_one(doc! { "userId": owner }).await?;
        Ok(found.map(TripPlan::from))
    }

    async fn delete_by_owner(&self, owner_id: &str) -> Result<bool, StoreError> {
        let owner = parse_object_id(owner_id)?;
        let result = self.collection.delete_many(doc! { "userId": owner }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn add_invited_user(&self, trip_id: &str, user_id: &str) -> Result<bool, StoreError> {
        let trip = parse_object_id(trip_id)?;
        let user = parse_object_id(user_id)?;
        let result = self
            .collection
            .update_one(
                doc! { "_id": trip },
                doc! { "$addToSet": { "invitedUsers": user } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
