use chrono::{DateTime, Duration, NaiveTime, Utc};
use log::{debug, error, info};
use std::{fmt, sync::Arc};

use super::{
    distance_service::ProximityGate,
    events_service::{EventDiscoveryChain, EventQuery, EventSource},
    generation_service::TextGenerator,
    geocoding_service::Geocoder,
    prompt_service::build_trip_prompt,
    response_parser::{parse_generation_response, sanitize},
};
use crate::{
    config::PlannerConfig,
    db::TripStore,
    error::ApiError,
    models::trip::{GeneratedPlan, TripPlan, TripRequest, TripStatus},
};

pub const GENERATION_FAILED_MESSAGE: &str =
    "There was an issue analyzing your goal. Please try again later.";
pub const PERSISTENCE_FAILED_MESSAGE: &str = "Failed to save the trip plan";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Geocoding,
    EventDiscovery,
    PromptBuilt,
    Generating,
    Parsing,
    Sanitizing,
    Persisting,
    Completed,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PipelineStage::Received => "received",
            PipelineStage::Geocoding => "geocoding",
            PipelineStage::EventDiscovery => "event-discovery",
            PipelineStage::PromptBuilt => "prompt-built",
            PipelineStage::Generating => "generating",
            PipelineStage::Parsing => "parsing",
            PipelineStage::Sanitizing => "sanitizing",
            PipelineStage::Persisting => "persisting",
            PipelineStage::Completed => "completed",
            PipelineStage::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Owned trips live until the end of the trip; anonymous ones for a fixed
/// window from now, whatever their duration.
pub fn compute_expiration(
    request: &TripRequest,
    now: DateTime<Utc>,
    anonymous_ttl_hours: i64,
) -> DateTime<Utc> {
    if request.owner_id.is_some() {
        let start = request.start_date.and_time(NaiveTime::MIN).and_utc();
        start
            .checked_add_signed(Duration::days(i64::from(request.duration_days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    } else {
        now.checked_add_signed(Duration::hours(anonymous_ttl_hours))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

pub fn assemble_plan(
    request: &TripRequest,
    generated: GeneratedPlan,
    now: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> TripPlan {
    TripPlan {
        id: None,
        destination: request.destination.clone(),
        date: request.start_date.and_time(NaiveTime::MIN).and_utc(),
        duration: request.duration_days,
        user_location: request.origin_location.clone(),
        budget: request.budget.clone(),
        visit_nearby: request.visit_nearby,
        pace: request.pace,
        trip_type: request.trip_type,
        trip_purpose: request.trip_purpose,
        user_id: request.owner_id.clone(),
        itinerary: generated.itinerary,
        travel_tips: generated.travel_tips,
        hotel_recommendations: generated.hotel_recommendations,
        flight_recommendations: generated.flight_recommendations,
        dining_options: generated.dining_options,
        reservations: generated.reservations,
        local_events: generated.local_events,
        invited_users: Vec::new(),
        status: TripStatus::Completed,
        created_at: now,
        expires_at: Some(expires_at),
    }
}

/// Runs one trip request through geocoding, event discovery, generation,
/// parsing and persistence. Nothing is written before the final step.
pub struct TripPlanner {
    gate: ProximityGate,
    events: EventDiscoveryChain,
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn TripStore>,
    config: PlannerConfig,
}

impl TripPlanner {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        event_sources: Vec<Arc<dyn EventSource>>,
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn TripStore>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            gate: ProximityGate::new(geocoder, config.near_threshold_meters),
            events: EventDiscoveryChain::new(event_sources),
            generator,
            store,
            config,
        }
    }

    pub async fn generate(&self, request: &TripRequest) -> Result<TripPlan, ApiError> {
        let result = self.run(request).await;
        match &result {
            Ok(plan) => stage(request, PipelineStage::Completed, plan.id.as_deref().unwrap_or("")),
            Err(e) => error!(
                "Trip to {} {}: {}",
                request.destination,
                PipelineStage::Failed,
                e
            ),
        }
        result
    }

    async fn run(&self, request: &TripRequest) -> Result<TripPlan, ApiError> {
        stage(request, PipelineStage::Received, "");

        stage(request, PipelineStage::Geocoding, &route_label(request));
        let proximity = self
            .gate
            .check(&request.origin_location, &request.destination)
            .await;

        stage(request, PipelineStage::EventDiscovery, "");
        let query = proximity.destination.map(|coordinates| EventQuery {
            destination: request.destination.clone(),
            coordinates,
            start_date: request.start_date,
            end_date: request.end_date(),
        });
        let discovery = self.events.discover(query).await;

        let prompt = build_trip_prompt(
            request,
            proximity.proximity,
            discovery.needs_generated_events(),
        );
        stage(request, PipelineStage::PromptBuilt, "");
        debug!("Prompt for {}:\n{}", request.destination, prompt);

        stage(request, PipelineStage::Generating, "");
        let raw = self
            .generator
            .generate(&prompt)
            .await
            .map_err(|e| ApiError::Generation {
                message: GENERATION_FAILED_MESSAGE.to_string(),
                cause: e.to_string(),
            })?;

        stage(request, PipelineStage::Parsing, "");
        let parsed = parse_generation_response(&raw)?;

        stage(request, PipelineStage::Sanitizing, "");
        let generated = sanitize(parsed, proximity.proximity, discovery.into_events());

        stage(request, PipelineStage::Persisting, "");
        let now = Utc::now();
        let expires_at = compute_expiration(request, now, self.config.anonymous_ttl_hours);
        let plan = assemble_plan(request, generated, now, expires_at);

        let saved = match &request.owner_id {
            Some(owner) => self.store.replace_for_owner(owner, plan).await,
            None => self.store.insert(plan).await,
        };
        saved.map_err(|e| ApiError::persistence(PERSISTENCE_FAILED_MESSAGE, e))
    }
}

fn route_label(request: &TripRequest) -> String {
    format!("{} -> {}", request.origin_location, request.destination)
}

fn stage(request: &TripRequest, stage: PipelineStage, detail: &str) {
    if detail.is_empty() {
        info!("Trip to {}: {}", request.destination, stage);
    } else {
        info!("Trip to {}: {} ({})", request.destination, stage, detail);
    }
}
