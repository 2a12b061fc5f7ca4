use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{distance_service::Coordinates, read_json, ServiceError};

/// Forward geocoding: free-text place name to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the provider knows no such place.
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, ServiceError>;
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// OpenStreetMap Nominatim search API.
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, ServiceError> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let places: Vec<NominatimPlace> = read_json(response).await?;
        let Some(first) = places.into_iter().next() else {
            return Ok(None);
        };

        let parse = |raw: &str| {
            raw.trim()
                .parse::<f64>()
                .map_err(|e| ServiceError::Response(format!("bad coordinate '{}': {}", raw, e)))
        };

        Ok(Some(Coordinates {
            latitude: parse(&first.lat)?,
            longitude: parse(&first.lon)?,
        }))
    }
}
