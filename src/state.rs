use std::sync::Arc;

use crate::{
    db::{FeedbackStore, InvitationStore, TripStore, UserDirectory},
    services::{email_service::Mailer, trip_generation_service::TripPlanner},
};

/// Shared handler state, registered once as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<TripPlanner>,
    pub trips: Arc<dyn TripStore>,
    pub feedback: Arc<dyn FeedbackStore>,
    pub invitations: Arc<dyn InvitationStore>,
    pub users: Arc<dyn UserDirectory>,
    /// `None` when no mail provider is configured.
    pub mailer: Option<Arc<dyn Mailer>>,
    pub generation_configured: bool,
}
