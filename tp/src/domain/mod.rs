//! Domain types for trip planning
//!
//! Core domain types: TripRequest, TripRecord, ConversationTurn.
//! TripRecord merges four independent provider outcomes; it is built once per
//! planning call and never mutated afterwards.

mod context;
mod failure;
mod id;
mod trip;
mod turn;

pub use context::ContextSnapshot;
pub use failure::{FailureKind, ProviderFailure, ProviderResult};
pub use id::generate_trip_id;
pub use trip::{Headline, RouteSummary, TripRecord, TripRequest, WeatherReport};
pub use turn::{ConversationTurn, Role};

/// Current time as Unix milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
