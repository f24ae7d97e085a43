//! TripPlanner - Trip Orchestration & Context Engine
//!
//! TripPlanner turns a trip request into a day plan by fanning out to live
//! providers (weather, news, routing, itinerary generation) and assembling
//! whatever comes back into a single record. Provider failures degrade the
//! matching section instead of sinking the plan.
//!
//! # Core Concepts
//!
//! - **Plans Degrade, Never Vanish**: a valid request always yields a record
//! - **Failures Are Values**: adapters return outcomes, they do not panic
//! - **Conversations Have Memory**: per-user context feeds follow-up questions
//! - **Trips Are Facts**: planned trips persist as graph facts, idempotently
//!
//! # Modules
//!
//! - [`domain`] - Trip requests, records, turns, and failure taxonomy
//! - [`providers`] - Provider clients behind narrow traits
//! - [`aggregate`] - Concurrent fan-out and record assembly
//! - [`session`] - Per-user conversation state
//! - [`facade`] - The orchestration surface the binary drives
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod domain;
pub mod facade;
pub mod providers;
pub mod repl;
pub mod session;

// Re-export commonly used types
pub use aggregate::TripAggregator;
pub use config::Config;
pub use domain::{
    ContextSnapshot, ConversationTurn, FailureKind, Headline, ProviderFailure, ProviderResult, Role, RouteSummary,
    TripRecord, TripRequest, WeatherReport,
};
pub use facade::{OrchestrationFacade, PlanError, PlannedTrip};
pub use providers::{ItineraryClient, NewsClient, Providers, RoutingClient, WeatherClient};
pub use session::{ConversationContext, SessionManager};
