//! Proximity gate
//!
//! Decides whether a traveller starts close enough to the destination that
//! flight suggestions are pointless.
//!
//! ## How it works
//! - Origin and destination are geocoded concurrently
//! - Great-circle (haversine) distance between the two points
//! - Below the configured threshold (100 km by default) the trip is "near"
//!
//! ## Failure policy
//! Any geocoding failure (no match, HTTP error, timeout) classifies the trip as
//! "far", so a flaky lookup never hides flight suggestions. There are no retries.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::geocoding_service::Geocoder;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proximity {
    Near,
    Far,
}

impl Proximity {
    pub fn wants_flights(&self) -> bool {
        matches!(self, Proximity::Far)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProximityCheck {
    pub proximity: Proximity,
    pub distance_meters: Option<f64>,
    /// Resolved destination, reused by event discovery.
    pub destination: Option<Coordinates>,
}

/// Great-circle distance between two points using the haversine formula.
pub fn haversine_meters(from: Coordinates, to: Coordinates) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

pub fn classify(distance_meters: f64, near_threshold_meters: f64) -> Proximity {
    if distance_meters < near_threshold_meters {
        Proximity::Near
    } else {
        Proximity::Far
    }
}

pub struct ProximityGate {
    geocoder: Arc<dyn Geocoder>,
    near_threshold_meters: f64,
}

impl ProximityGate {
    pub fn new(geocoder: Arc<dyn Geocoder>, near_threshold_meters: f64) -> Self {
        Self {
            geocoder,
            near_threshold_meters,
        }
    }

    pub async fn check(&self, origin: &str, destination: &str) -> ProximityCheck {
        let (origin_result, destination_result) = tokio::join!(
            self.geocoder.geocode(origin),
            self.geocoder.geocode(destination)
        );

        let origin_coords = resolved("origin", origin, origin_result);
        let destination_coords = resolved("destination", destination, destination_result);

        match (origin_coords, destination_coords) {
            (Some(from), Some(to)) => {
                let distance = haversine_meters(from, to);
                let proximity = classify(distance, self.near_threshold_meters);
                info!(
                    "{} -> {} is {:.1} km apart ({:?})",
                    origin,
                    destination,
                    distance / 1000.0,
                    proximity
                );
                ProximityCheck {
                    proximity,
                    distance_meters: Some(distance),
                    destination: Some(to),
                }
            }
            (_, destination) => ProximityCheck {
                proximity: Proximity::Far,
                distance_meters: None,
                destination,
            },
        }
    }
}

fn resolved<E: std::fmt::Display>(
    role: &str,
    place: &str,
    result: Result<Option<Coordinates>, E>,
) -> Option<Coordinates> {
    match result {
        Ok(Some(coords)) => {
            debug!("Geocoded {} '{}' to {:?}", role, place, coords);
            Some(coords)
        }
        Ok(None) => {
            warn!("No geocoding match for {} '{}'", role, place);
            None
        }
        Err(e) => {
            warn!("Geocoding {} '{}' failed: {}", role, place, e);
            None
        }
    }
}
