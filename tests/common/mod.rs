#![allow(dead_code)]

use actix_web::{web, App};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use mongodb::bson::oid::ObjectId;
use serde_json::json;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use trip_planner_api::{
    config::PlannerConfig,
    db::{FeedbackStore, InvitationStore, StoreError, TripStore, UserDirectory},
    middleware::auth::Claims,
    models::{
        feedback::Feedback,
        invitation::{Invitation, InviteStatus},
        trip::{LocalEvent, TripPlan},
        user::UserSummary,
    },
    routes,
    services::{
        distance_service::Coordinates,
        email_service::Mailer,
        events_service::{EventQuery, EventSource},
        generation_service::TextGenerator,
        geocoding_service::Geocoder,
        trip_generation_service::TripPlanner,
        ServiceError,
    },
    AppState,
};

pub const JWT_SECRET: &str = "test-secret";
pub const API_PREFIX: &str = "/api/v1";

pub const OWNER_ID: &str = "65f1a2b3c4d5e6f708192a3b";
pub const FRIEND_ID: &str = "65f1a2b3c4d5e6f708192a3c";
pub const FRIEND_EMAIL: &str = "friend@example.com";

pub fn new_id() -> String {
    ObjectId::new().to_hex()
}

pub fn token_for(user_id: &str) -> String {
    sign(user_id, Utc::now() + Duration::hours(1))
}

pub fn expired_token_for(user_id: &str) -> String {
    sign(user_id, Utc::now() - Duration::hours(1))
}

fn sign(user_id: &str, exp: chrono::DateTime<Utc>) -> String {
    let claims = Claims {
        user_id: user_id.to_string(),
        exp: exp.timestamp() as usize,
        iat: Some(Utc::now().timestamp() as usize),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// A generation answer the way the model tends to send it: fenced, with
/// descriptive reservation keys and one unusable booking link.
pub fn sample_generation_response() -> String {
    let plan = json!({
        "itinerary": [
            {
                "date": "2025-06-01",
                "activities": [
                    {"morning": {"activityName": "Belem Tower", "estimatedDuration": "2 hours", "location": "Belem", "routeInformation": "Tram 15"}},
                    {"afternoon": {"activityName": "Jeronimos Monastery", "estimatedDuration": "2 hours", "location": "Belem", "routeInformation": "Walk"}},
                    {"evening": {"activityName": "Fado dinner", "estimatedDuration": "3 hours", "location": "Alfama", "routeInformation": "Taxi"}}
                ]
            },
            {
                "date": "2025-06-02",
                "activities": [
                    {"morning": {"activityName": "Sintra day trip", "estimatedDuration": "6 hours", "location": "Sintra", "routeInformation": "Train from Rossio"}}
                ]
            }
        ],
        "travelTips": [
            {"Weather-related advice": "Sunny, bring sunscreen"},
            {"Safety guidelines for Lisbon": "Watch for pickpockets on tram 28"},
            {"Local transportation": "Buy a Viva Viagem card"},
            {"Cultural etiquette": "Greet shopkeepers"}
        ],
        "hotelRecommendations": [
            {"hotelName": "Memmo Alfama", "pricingDetails": "€180/night", "websiteLink": "https://memmo.example"}
        ],
        "flightRecommendations": [
            {"flightName": "TAP TP1017", "pricingDetails": "€95", "bookingWebsiteURL": "https://flytap.example"}
        ],
        "diningOptions": ["Cervejaria Ramiro, Seafood, €€"],
        "reservations": [
            {"Name of the attraction/activity": "Oceanario", "Booking link": "https://example.com/book", "Recommended booking timeframe": "1 week", "Estimated cost per person": "€25"},
            {"Name of the attraction/activity": "Tagus boat tour", "Booking link": "Contact local guide", "Recommended booking timeframe": "", "Estimated cost per person": "€40"}
        ],
        "localEvents": [
            {"eventName": "Model street party", "date": "2025-06-03", "description": "Invented by the model", "url": ""}
        ]
    });
    format!("```json\n{}\n```", serde_json::to_string_pretty(&plan).unwrap())
}

pub fn event(name: &str) -> LocalEvent {
    LocalEvent {
        event_name: name.to_string(),
        date: "2025-06-02".to_string(),
        description: format!("{} description", name),
        url: String::new(),
    }
}

pub struct StubGeocoder {
    places: HashMap<String, Coordinates>,
}

impl StubGeocoder {
    /// Lisbon, Sintra (about 25 km away) and Madrid (about 500 km away).
    pub fn new() -> Self {
        let places = HashMap::from([
            ("Lisbon".to_string(), Coordinates { latitude: 38.7223, longitude: -9.1393 }),
            ("Sintra".to_string(), Coordinates { latitude: 38.8029, longitude: -9.3817 }),
            ("Madrid".to_string(), Coordinates { latitude: 40.4168, longitude: -3.7038 }),
        ]);
        Self { places }
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, ServiceError> {
        if place == "Offline" {
            return Err(ServiceError::Status {
                status: 503,
                body: "geocoder unavailable".to_string(),
            });
        }
        Ok(self.places.get(place).copied())
    }
}

#[derive(Clone)]
pub enum SourceBehaviour {
    Fail,
    Events(Vec<LocalEvent>),
}

pub struct StubEventSource {
    name: &'static str,
    behaviour: SourceBehaviour,
    pub calls: AtomicUsize,
}

impl StubEventSource {
    pub fn new(name: &'static str, behaviour: SourceBehaviour) -> Arc<Self> {
        Arc::new(Self {
            name,
            behaviour,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSource for StubEventSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, _query: &EventQuery) -> Result<Vec<LocalEvent>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behaviour {
            SourceBehaviour::Fail => Err(ServiceError::Response("events unavailable".to_string())),
            SourceBehaviour::Events(events) => Ok(events.clone()),
        }
    }
}

pub struct StubGenerator {
    response: Result<String, String>,
    pub prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn new(response: Result<String, String>) -> Arc<Self> {
        Arc::new(Self {
            response,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.response.clone().map_err(|body| ServiceError::Status { status: 500, body })
    }
}

#[derive(Default)]
pub struct MemoryTripStore {
    pub trips: Mutex<Vec<TripPlan>>,
    pub fail_writes: AtomicBool,
}

impl MemoryTripStore {
    pub fn count(&self) -> usize {
        self.trips.lock().unwrap().len()
    }

    pub fn seed(&self, mut plan: TripPlan) -> String {
        let id = new_id();
        plan.id = Some(id.clone());
        self.trips.lock().unwrap().push(plan);
        id
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Missing("write acknowledgement".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TripStore for MemoryTripStore {
    async fn insert(&self, mut plan: TripPlan) -> Result<TripPlan, StoreError> {
        self.check_writable()?;
        plan.id = Some(new_id());
        self.trips.lock().unwrap().push(plan.clone());
        Ok(plan)
    }

    async fn replace_for_owner(
        &self,
        owner_id: &str,
        mut plan: TripPlan,
    ) -> Result<TripPlan, StoreError> {
        self.check_writable()?;
        let mut trips = self.trips.lock().unwrap();
        plan.user_id = Some(owner_id.to_string());
        match trips
            .iter_mut()
            .find(|t| t.user_id.as_deref() == Some(owner_id))
        {
            Some(existing) => {
                plan.id = existing.id.clone();
                plan.invited_users = existing.invited_users.clone();
                *existing = plan.clone();
            }
            None => {
                plan.id = Some(new_id());
                trips.push(plan.clone());
            }
        }
        Ok(plan)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<TripPlan>, StoreError> {
        let trips = self.trips.lock().unwrap();
        Ok(trips.iter().find(|t| t.id.as_deref() == Some(id)).cloned())
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Option<TripPlan>, StoreError> {
        let trips = self.trips.lock().unwrap();
        Ok(trips
            .iter()
            .find(|t| t.user_id.as_deref() == Some(owner_id))
            .cloned())
    }

    async fn delete_by_owner(&self, owner_id: &str) -> Result<bool, StoreError> {
        let mut trips = self.trips.lock().unwrap();
        let before = trips.len();
        trips.retain(|t| t.user_id.as_deref() != Some(owner_id));
        Ok(trips.len() < before)
    }

    async fn add_invited_user(&self, trip_id: &str, user_id: &str) -> Result<bool, StoreError> {
        let mut trips = self.trips.lock().unwrap();
        let Some(trip) = trips.iter_mut().find(|t| t.id.as_deref() == Some(trip_id)) else {
            return Ok(false);
        };
        if !trip.invited_users.iter().any(|u| u == user_id) {
            trip.invited_users.push(user_id.to_string());
        }
        Ok(true)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryFeedbackStore {
    pub feedback: Mutex<Vec<Feedback>>,
}

#[async_trait]
impl FeedbackStore for MemoryFeedbackStore {
    async fn insert(&self, mut feedback: Feedback) -> Result<Feedback, StoreError> {
        feedback.id = Some(new_id());
        self.feedback.lock().unwrap().push(feedback.clone());
        Ok(feedback)
    }

    async fn list(&self) -> Result<Vec<Feedback>, StoreError> {
        let mut all = self.feedback.lock().unwrap().clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}

#[derive(Default)]
pub struct MemoryInvitationStore {
    pub invites: Mutex<Vec<Invitation>>,
}

#[async_trait]
impl InvitationStore for MemoryInvitationStore {
    async fn insert(&self, mut invite: Invitation) -> Result<Invitation, StoreError> {
        invite.id = Some(new_id());
        self.invites.lock().unwrap().push(invite.clone());
        Ok(invite)
    }

    async fn find_pending(
        &self,
        trip_id: &str,
        inviter_id: &str,
        invited_user_id: &str,
    ) -> Result<Option<Invitation>, StoreError> {
        let invites = self.invites.lock().unwrap();
        Ok(invites
            .iter()
            .find(|i| {
                i.trip_id == trip_id
                    && i.inviter_id == inviter_id
                    && i.invited_user_id == invited_user_id
                    && i.status == InviteStatus::Pending
            })
            .cloned())
    }

    async fn list_for_invitee(
        &self,
        invited_user_id: &str,
        status: InviteStatus,
    ) -> Result<Vec<Invitation>, StoreError> {
        let invites = self.invites.lock().unwrap();
        Ok(invites
            .iter()
            .filter(|i| i.invited_user_id == invited_user_id && i.status == status)
            .cloned()
            .collect())
    }

    async fn respond(
        &self,
        invite_id: &str,
        invited_user_id: &str,
        status: InviteStatus,
    ) -> Result<Option<Invitation>, StoreError> {
        let mut invites = self.invites.lock().unwrap();
        let Some(invite) = invites.iter_mut().find(|i| {
            i.id.as_deref() == Some(invite_id)
                && i.invited_user_id == invited_user_id
                && i.status == InviteStatus::Pending
        }) else {
            return Ok(None);
        };
        invite.status = status;
        Ok(Some(invite.clone()))
    }
}

pub struct MemoryUserDirectory {
    users: Vec<UserSummary>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            users: vec![
                UserSummary {
                    id: OWNER_ID.to_string(),
                    name: "Ana Owner".to_string(),
                    email: "owner@example.com".to_string(),
                },
                UserSummary {
                    id: FRIEND_ID.to_string(),
                    name: "Rui Friend".to_string(),
                    email: FRIEND_EMAIL.to_string(),
                },
            ],
        }
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserSummary>, StoreError> {
        let email = email.to_lowercase();
        Ok(self.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserSummary>, StoreError> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub fail: bool,
    pub sent: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<(), ServiceError> {
        if self.fail {
            return Err(ServiceError::Status {
                status: 401,
                body: "bad api key".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), html.to_string()));
        Ok(())
    }
}

pub struct TestOptions {
    pub primary: SourceBehaviour,
    pub secondary: SourceBehaviour,
    pub generation: Result<String, String>,
    pub mailer_fails: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            primary: SourceBehaviour::Fail,
            secondary: SourceBehaviour::Fail,
            generation: Ok(sample_generation_response()),
            mailer_fails: false,
        }
    }
}

pub struct TestApp {
    pub state: AppState,
    pub trips: Arc<MemoryTripStore>,
    pub invitations: Arc<MemoryInvitationStore>,
    pub generator: Arc<StubGenerator>,
    pub primary: Arc<StubEventSource>,
    pub secondary: Arc<StubEventSource>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(TestOptions::default())
    }

    pub fn with(options: TestOptions) -> Self {
        let trips = Arc::new(MemoryTripStore::default());
        let invitations = Arc::new(MemoryInvitationStore::default());
        let generator = StubGenerator::new(options.generation);
        let primary = StubEventSource::new("primary", options.primary);
        let secondary = StubEventSource::new("secondary", options.secondary);
        let mailer = Arc::new(RecordingMailer {
            fail: options.mailer_fails,
            ..Default::default()
        });

        let sources: Vec<Arc<dyn EventSource>> = vec![primary.clone(), secondary.clone()];
        let planner = TripPlanner::new(
            Arc::new(StubGeocoder::new()),
            sources,
            generator.clone(),
            trips.clone(),
            PlannerConfig::default(),
        );

        let state = AppState {
            planner: Arc::new(planner),
            trips: trips.clone(),
            feedback: Arc::new(MemoryFeedbackStore::default()),
            invitations: invitations.clone(),
            users: Arc::new(MemoryUserDirectory::new()),
            mailer: Some(mailer.clone()),
            generation_configured: true,
        };

        Self {
            state,
            trips,
            invitations,
            generator,
            primary,
            secondary,
            mailer,
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .configure(|cfg| routes::configure(cfg, API_PREFIX, JWT_SECRET))
    }
}

pub fn trip_body(destination: &str, origin: &str, user_id: Option<&str>) -> serde_json::Value {
    let mut body = json!({
        "destination": destination,
        "date": "2025-06-01",
        "duration": 5,
        "userLocation": origin,
        "budget": 1500,
        "visitNearby": false,
        "pace": "Moderate",
        "tripType": "Cultural Immersion",
        "tripPurpose": "Vacation"
    });
    if let Some(id) = user_id {
        body["userId"] = json!(id);
    }
    body
}
