pub mod feedback;
pub mod invitations;
pub mod mongo;
pub mod trips;
pub mod users;

use thiserror::Error;

pub use feedback::{FeedbackStore, MongoFeedbackStore};
pub use invitations::{InvitationStore, MongoInvitationStore};
pub use trips::{MongoTripStore, TripStore};
pub use users::{MongoUserDirectory, UserDirectory};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("failed to encode document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),
    #[error("'{0}' is not a valid id")]
    InvalidId(String),
    #[error("{0} was not returned by the store")]
    Missing(String),
}
