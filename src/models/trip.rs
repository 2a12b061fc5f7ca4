pub mod document;
pub mod plan;
pub mod request;

pub use document::TripPlanDocument;
pub use plan::{
    Activity, DayActivities, DiningOption, GeneratedPlan, ItineraryDay, LocalEvent,
    Recommendation, Reservation, TravelTip, TripPlan, TripStatus,
};
pub use request::{Budget, Pace, TripPurpose, TripRequest, TripRequestInput, TripType};
