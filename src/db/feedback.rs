use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Client, Collection};

use super::{mongo::FEEDBACK, StoreError};
use crate::models::feedback::{Feedback, FeedbackDocument};

#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn insert(&self, feedback: Feedback) -> Result<Feedback, StoreError>;

    /// Newest first.
    async fn list(&self) -> Result<Vec<Feedback>, StoreError>;
}

pub struct MongoFeedbackStore {
    collection: Collection<FeedbackDocument>,
}

impl MongoFeedbackStore {
    pub fn new(client: &Client, database: &str) -> Self {
        Self {
            collection: client.database(database).collection(FEEDBACK),
        }
    }
}

#[async_trait]
impl FeedbackStore for MongoFeedbackStore {
    async fn insert(&self, feedback: Feedback) -> Result<Feedback, StoreError> {
        let mut document = FeedbackDocument::try_from(feedback)?;
        let result = self.collection.insert_one(&document).await?;
        document.id = result.inserted_id.as_object_id();
        Ok(document.into())
    }

    async fn list(&self) -> Result<Vec<Feedback>, StoreError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await?;
        let documents: Vec<FeedbackDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Feedback::from).collect())
    }
}
