use async_trait::async_trait;
use mongodb::{bson::doc, Client, Collection};

use super::{mongo::USERS, StoreError};
use crate::models::{trip::document::parse_object_id, user::{UserDocument, UserSummary}};

/// Lookup into the account collection owned by the auth service.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserSummary>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<UserSummary>, StoreError>;
}

pub struct MongoUserDirectory {
    collection: Collection<UserDocument>,
}

impl MongoUserDirectory {
    pub fn new(client: &Client, database: &str) -> Self {
        Self {
            collection: client.database(database).collection(USERS),
        }
    }
}

#[async_trait]
impl UserDirectory for MongoUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserSummary>, StoreError> {
        let email = email.trim().to_lowercase();
        let found = self.collection.find_one(doc! { "email": email }).await?;
        Ok(found.map(UserSummary::from))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserSummary>, StoreError> {
        let Ok(id) = parse_object_id(id) else {
            return Ok(None);
        };
        let found = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(found.map(UserSummary::from))
    }
}
