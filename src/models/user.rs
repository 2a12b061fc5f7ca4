use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Read-only projection of an account; accounts themselves are managed elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: Option<String>,
    pub email: String,
}

impl From<UserDocument> for UserSummary {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            name: doc.name.unwrap_or_default(),
            email: doc.email,
        }
    }
}
