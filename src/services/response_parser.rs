//! Turns free-text generation output into a [`GeneratedPlan`].
//!
//! The model is asked for JSON but answers are often wrapped in Markdown fences
//! or prose, use descriptive keys instead of camelCase ones, and mix strings
//! with objects in the same list. Everything is normalized here so the rest of
//! the service only sees typed values.

use log::{debug, warn};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use super::distance_service::Proximity;
use crate::{
    error::ApiError,
    models::trip::{
        Activity, DayActivities, DiningOption, GeneratedPlan, ItineraryDay, LocalEvent,
        Recommendation, Reservation, TravelTip,
    },
};

pub const MALFORMED_MESSAGE: &str =
    "Failed to parse the plan data. Please ensure the API returns a valid JSON format.";

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"(?i)```(json)?").expect("fence pattern is valid"))
}

/// Removes every "```json" and "```" marker.
pub fn strip_code_fences(raw: &str) -> String {
    fence_pattern().replace_all(raw, "").trim().to_string()
}

/// The outermost `{ ... }` span, dropping any prose around it.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlan {
    itinerary: Option<Value>,
    travel_tips: Option<Value>,
    hotel_recommendations: Option<Value>,
    flight_recommendations: Option<Value>,
    dining_options: Option<Value>,
    reservations: Option<Value>,
    local_events: Option<Value>,
}

fn malformed(cause: impl Into<String>) -> ApiError {
    ApiError::MalformedResponse {
        message: MALFORMED_MESSAGE.to_string(),
        cause: cause.into(),
    }
}

pub fn parse_generation_response(raw: &str) -> Result<GeneratedPlan, ApiError> {
    let stripped = strip_code_fences(raw);
    let json = extract_json_object(&stripped)
        .ok_or_else(|| malformed("no JSON object found in generation response"))?;

    let plan: RawPlan = serde_json::from_str(json).map_err(|e| malformed(e.to_string()))?;

    let itinerary = match plan.itinerary {
        Some(Value::Array(days)) => days.iter().filter_map(itinerary_day).collect(),
        Some(other) => {
            return Err(malformed(format!(
                "itinerary must be an array, got {}",
                kind_of(&other)
            )))
        }
        None => return Err(malformed("missing itinerary")),
    };

    let parsed = GeneratedPlan {
        itinerary,
        travel_tips: items(plan.travel_tips).iter().flat_map(travel_tips).collect(),
        hotel_recommendations: items(plan.hotel_recommendations)
            .iter()
            .filter_map(recommendation)
            .collect(),
        flight_recommendations: items(plan.flight_recommendations)
            .iter()
            .filter_map(recommendation)
            .collect(),
        dining_options: items(plan.dining_options)
            .iter()
            .filter_map(dining_option)
            .collect(),
        reservations: items(plan.reservations)
            .iter()
            .filter_map(reservation)
            .collect(),
        local_events: items(plan.local_events)
            .iter()
            .filter_map(local_event)
            .collect(),
    };

    debug!(
        "Parsed plan: {} days, {} tips, {} reservations",
        parsed.itinerary.len(),
        parsed.travel_tips.len(),
        parsed.reservations.len()
    );
    Ok(parsed)
}

/// Drops unusable reservations, clears flights for nearby trips and picks
/// which local events to keep.
pub fn sanitize(
    mut plan: GeneratedPlan,
    proximity: Proximity,
    discovered_events: Vec<LocalEvent>,
) -> GeneratedPlan {
    let before = plan.reservations.len();
    plan.reservations
        .retain(|r| has_usable_booking_link(&r.booking_link));
    if plan.reservations.len() < before {
        warn!(
            "Dropped {} reservations without a usable booking link",
            before - plan.reservations.len()
        );
    }

    if !proximity.wants_flights() {
        plan.flight_recommendations.clear();
    }

    plan.local_events =
        select_local_events(discovered_events, std::mem::take(&mut plan.local_events));
    plan
}

pub fn has_usable_booking_link(link: &str) -> bool {
    !link.trim().is_empty()
        && !link.to_lowercase().contains("contact local")
        && link.starts_with("http")
}

/// Discovered events win over anything the model produced.
pub fn select_local_events(
    discovered: Vec<LocalEvent>,
    generated: Vec<LocalEvent>,
) -> Vec<LocalEvent> {
    if discovered.is_empty() {
        generated
    } else {
        discovered
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Lists are expected, but a lone object is treated as a one-element list.
fn items(value: Option<Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(values)) => values,
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other],
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}

fn first_text(object: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
        .map(|value| text(Some(value)))
        .unwrap_or_default()
}

fn activity(value: &Value) -> Option<Activity> {
    let object = value.as_object()?;
    Some(Activity {
        activity_name: first_text(object, &["activityName", "name"]),
        estimated_duration: first_text(object, &["estimatedDuration", "duration"]),
        location: text(object.get("location")),
        route_information: first_text(object, &["routeInformation", "route"]),
    })
}

fn assign_slot(activities: &mut DayActivities, slot: &str, value: &Value) {
    let target = match slot.to_lowercase().as_str() {
        "morning" => &mut activities.morning,
        "afternoon" => &mut activities.afternoon,
        "evening" => &mut activities.evening,
        _ => return,
    };
    if target.is_none() {
        *target = activity(value);
    }
}

fn itinerary_day(value: &Value) -> Option<ItineraryDay> {
    let object = value.as_object()?;
    let mut activities = DayActivities::default();

    match object.get("activities") {
        Some(Value::Array(entries)) => {
            for entry in entries.iter().filter_map(Value::as_object) {
                for (slot, value) in entry {
                    assign_slot(&mut activities, slot, value);
                }
            }
        }
        Some(Value::Object(slots)) => {
            for (slot, value) in slots {
                assign_slot(&mut activities, slot, value);
            }
        }
        _ => {}
    }

    Some(ItineraryDay {
        date: text(object.get("date")),
        activities,
    })
}

fn travel_tips(value: &Value) -> Vec<TravelTip> {
    match value {
        Value::Null => Vec::new(),
        Value::Object(object) => object
            .iter()
            .map(|(title, body)| TravelTip::Structured {
                title: title.clone(),
                body: text(Some(body)),
            })
            .collect(),
        other => vec![TravelTip::Plain {
            text: text(Some(other)),
        }],
    }
}

fn dining_option(value: &Value) -> Option<DiningOption> {
    match value {
        Value::Null => None,
        Value::Object(object) => Some(DiningOption::Structured {
            name: first_text(object, &["name", "restaurantName", "RestaurantName"]),
            cuisine: first_text(object, &["cuisine", "specificCuisine", "SpecificCuisine"]),
            price_range: first_text(object, &["priceRange", "PriceRange", "price"]),
        }),
        other => Some(DiningOption::Plain {
            text: text(Some(other)),
        }),
    }
}

fn recommendation(value: &Value) -> Option<Recommendation> {
    match value {
        Value::Object(object) => Some(Recommendation {
            name: first_text(object, &["name", "hotelName", "flightName"]),
            pricing_details: first_text(object, &["pricingDetails", "price"]),
            link: first_text(
                object,
                &["link", "websiteLink", "bookingWebsiteURL", "bookingLink"],
            ),
        }),
        Value::String(name) => Some(Recommendation {
            name: name.trim().to_string(),
            ..Default::default()
        }),
        _ => None,
    }
}

fn reservation(value: &Value) -> Option<Reservation> {
    let object = value.as_object()?;
    Some(Reservation {
        attraction_name: first_text(
            object,
            &["attractionName", "Name of the attraction/activity", "name"],
        ),
        booking_link: first_text(object, &["bookingLink", "Booking link"]),
        recommended_timeframe: first_text(
            object,
            &["recommendedTimeframe", "Recommended booking timeframe"],
        ),
        estimated_cost: first_text(object, &["estimatedCost", "Estimated cost per person"]),
    })
}

fn local_event(value: &Value) -> Option<LocalEvent> {
    let object = value.as_object()?;
    Some(LocalEvent {
        event_name: first_text(object, &["eventName", "name", "title"]),
        date: text(object.get("date")),
        description: text(object.get("description")),
        url: first_text(object, &["url", "link"]),
    })
}
