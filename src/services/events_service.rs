use async_trait::async_trait;
use chrono::NaiveDate;
use log::{info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::{sync::Arc, time::Duration};

use super::{distance_service::Coordinates, read_json, ServiceError};
use crate::models::trip::LocalEvent;

pub const MAX_EVENTS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    pub destination: String,
    pub coordinates: Coordinates,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl EventQuery {
    fn start(&self) -> String {
        self.start_date.format("%Y-%m-%d").to_string()
    }
}

/// One external source of local events.
#[async_trait]
pub trait EventSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, query: &EventQuery) -> Result<Vec<LocalEvent>, ServiceError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventDiscovery {
    Found {
        source: &'static str,
        events: Vec<LocalEvent>,
    },
    /// Every source failed; the prompt has to ask the model for events.
    NeedsGenerated,
}

impl EventDiscovery {
    pub fn needs_generated_events(&self) -> bool {
        matches!(self, EventDiscovery::NeedsGenerated)
    }

    pub fn into_events(self) -> Vec<LocalEvent> {
        match self {
            EventDiscovery::Found { events, .. } => events,
            EventDiscovery::NeedsGenerated => Vec::new(),
        }
    }
}

/// Tries each source strictly in order and stops at the first one that returns
/// at least one event. Errors and empty payloads both move on to the next source.
pub async fn first_success(
    sources: &[Arc<dyn EventSource>],
    query: &EventQuery,
) -> Option<(&'static str, Vec<LocalEvent>)> {
    for source in sources {
        match source.fetch(query).await {
            Ok(mut events) if !events.is_empty() => {
                events.truncate(MAX_EVENTS);
                return Some((source.name(), events));
            }
            Ok(_) => info!("{} returned no events for {}", source.name(), query.destination),
            Err(e) => warn!("{} failed for {}: {}", source.name(), query.destination, e),
        }
    }
    None
}

pub struct EventDiscoveryChain {
    sources: Vec<Arc<dyn EventSource>>,
}

impl EventDiscoveryChain {
    pub fn new(sources: Vec<Arc<dyn EventSource>>) -> Self {
        Self { sources }
    }

    /// `query` is `None` when the destination could not be geocoded; no source
    /// is contacted in that case.
    pub async fn discover(&self, query: Option<EventQuery>) -> EventDiscovery {
        let Some(query) = query else {
            info!("Destination unresolved, local events will be generated");
            return EventDiscovery::NeedsGenerated;
        };

        match first_success(&self.sources, &query).await {
            Some((source, events)) => {
                info!("Found {} local events via {}", events.len(), source);
                EventDiscovery::Found { source, events }
            }
            None => EventDiscovery::NeedsGenerated,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    events_results: Option<Vec<SerpApiEvent>>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SerpApiEvent {
    title: Option<String>,
    date: Option<SerpApiDate>,
    description: Option<String>,
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SerpApiDate {
    when: Option<String>,
    start_date: Option<String>,
}

/// SerpApi Google Events search, scoped by destination and free text.
pub struct SerpApiEvents {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl SerpApiEvents {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl EventSource for SerpApiEvents {
    fn name(&self) -> &'static str {
        "serpapi"
    }

    async fn fetch(&self, query: &EventQuery) -> Result<Vec<LocalEvent>, ServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ServiceError::NotConfigured("SERPAPI_API_KEY"))?;
        let search = format!("events in {}", query.destination);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("engine", "google_events"),
                ("q", search.as_str()),
                ("location", query.destination.as_str()),
                ("hl", "en"),
                ("gl", "us"),
                ("api_key", api_key),
            ])
            .send()
            .await?;

        let payload: SerpApiResponse = read_json(response).await?;
        if let Some(error) = payload.error {
            return Err(ServiceError::Response(error));
        }

        let start = query.start();
        Ok(payload
            .events_results
            .unwrap_or_default()
            .into_iter()
            .filter_map(|event| {
                let title = event.title.filter(|t| !t.trim().is_empty())?;
                let date = event
                    .date
                    .and_then(|d| d.when.or(d.start_date))
                    .unwrap_or_else(|| start.clone());
                Some(LocalEvent {
                    description: event.description.unwrap_or_else(|| title.clone()),
                    event_name: title,
                    date,
                    url: event.link.unwrap_or_default(),
                })
            })
            .take(MAX_EVENTS)
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    events: Option<Vec<OpenMeteoEvent>>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoEvent {
    name: Option<String>,
    date: Option<String>,
    description: Option<String>,
}

/// Coordinate and date-range scoped events lookup.
pub struct OpenMeteoEvents {
    client: Client,
    base_url: String,
}

impl OpenMeteoEvents {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.to_string(),
        })
    }
}

#[async_trait]
impl EventSource for OpenMeteoEvents {
    fn name(&self) -> &'static str {
        "open-meteo"
    }

    async fn fetch(&self, query: &EventQuery) -> Result<Vec<LocalEvent>, ServiceError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", query.coordinates.latitude.to_string()),
                ("longitude", query.coordinates.longitude.to_string()),
                ("start_date", query.start()),
                ("end_date", query.end_date.format("%Y-%m-%d").to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?;

        let payload: OpenMeteoResponse = read_json(response).await?;
        let start = query.start();

        Ok(payload
            .events
            .unwrap_or_default()
            .into_iter()
            .take(MAX_EVENTS)
            .map(|event| {
                let description = event
                    .description
                    .or_else(|| event.name.clone())
                    .unwrap_or_else(|| format!("Local event in {}", query.destination));
                LocalEvent {
                    event_name: event.name.unwrap_or_else(|| "Local Event".to_string()),
                    date: event.date.unwrap_or_else(|| start.clone()),
                    description,
                    url: String::new(),
                }
            })
            .collect())
    }
}
