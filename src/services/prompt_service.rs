use super::distance_service::Proximity;
use crate::models::trip::TripRequest;

const FLIGHTS_BLOCK: &str = r#"  "flightRecommendations": [
    {"flightName": "", "pricingDetails": "", "bookingWebsiteURL": ""}
  ],
"#;

const EVENTS_BLOCK: &str = r#",
  "localEvents": [
    {"eventName": "Event Name", "date": "YYYY-MM-DD during trip", "description": "Brief description", "url": ""}
  ]"#;

/// Builds the generation prompt. Flights are requested only for far trips and
/// local events only when no real events were discovered.
pub fn build_trip_prompt(
    request: &TripRequest,
    proximity: Proximity,
    include_event_request: bool,
) -> String {
    let mut prompt = format!(
        "Plan a {}-day {} {} itinerary to {} starting {} (budget: {}).\nFrom: {}. Purpose: {}.\n",
        request.duration_days,
        request.pace,
        request.trip_type,
        request.destination,
        request.start_date.format("%Y-%m-%d"),
        request.budget,
        request.origin_location,
        request.trip_purpose,
    );
    if request.visit_nearby {
        prompt.push_str("Include 2-3 nearby locations to visit.\n");
    }

    prompt.push_str(
        r#"
Return only JSON with:
{
  "itinerary": [{
    "date": "YYYY-MM-DD",
    "activities": [
      {"morning": {"activityName": "", "estimatedDuration": "", "location": "", "routeInformation": ""}},
      {"afternoon": {"activityName": "", "estimatedDuration": "", "location": "", "routeInformation": ""}},
      {"evening": {"activityName": "", "estimatedDuration": "", "location": "", "routeInformation": ""}}
    ]
  }],
  "travelTips": [
    {"Weather-related advice": ""},
"#,
    );
    prompt.push_str(&format!(
        "    {{\"Safety guidelines for {}\": \"\"}},\n",
        request.destination
    ));
    prompt.push_str(
        r#"    {"Local transportation": ""},
    {"Cultural etiquette": ""}
  ],
  "hotelRecommendations": [
    {"hotelName": "", "pricingDetails": "", "websiteLink": ""}
  ],
"#,
    );

    if proximity.wants_flights() {
        prompt.push_str(FLIGHTS_BLOCK);
    }

    prompt.push_str(
        r#"  "diningOptions": [
    "RestaurantName, SpecificCuisine, PriceRange"
  ],
  "reservations": [
    {"attractionName": "", "bookingLink": "https://...", "recommendedTimeframe": "", "estimatedCost": ""}
  ]"#,
    );

    if include_event_request {
        prompt.push_str(EVENTS_BLOCK);
    }

    prompt.push_str("\n}\n");
    prompt
}
