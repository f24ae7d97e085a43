//! OrchestrationFacade - the single entry point for planning and chat
//!
//! Owns the aggregator, the session map, and the trip store. Callers hand it
//! a request or a chat message; everything else (validation, fan-out,
//! session bookkeeping, persistence) happens behind this boundary.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use tripstore::{StoreError, TripFact, TripStore};

use crate::aggregate::TripAggregator;
use crate::config::Config;
use crate::domain::{ProviderFailure, TripRecord, TripRequest};
use crate::providers::{ItineraryClient, ItineraryRequest, Providers};
use crate::session::SessionManager;

/// Errors a facade call can surface to the caller
#[derive(Debug, Error)]
pub enum PlanError {
    /// The request failed validation before any provider was called
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A conversation turn arrived for a user with no open session
    #[error("no active session for user '{0}'")]
    NoActiveSession(String),

    /// The generator failed a conversation turn
    #[error(transparent)]
    Generation(#[from] ProviderFailure),
}

/// Outcome of a planning call
///
/// The record is always present. Persistence is secondary: a store that was
/// down when the trip was planned shows up here, not as a failure of the
/// planning call itself.
#[derive(Debug)]
pub struct PlannedTrip {
    pub record: Arc<TripRecord>,
    pub store_status: Result<(), StoreError>,
}

/// Facade over planning, conversation, and persistence
pub struct OrchestrationFacade {
    aggregator: TripAggregator,
    itinerary: Arc<dyn ItineraryClient>,
    sessions: SessionManager,
    store: Arc<dyn TripStore>,
}

impl OrchestrationFacade {
    /// Wire up a facade from provider clients, a store, and configuration
    pub fn new(providers: Providers, store: Arc<dyn TripStore>, config: &Config) -> Self {
        debug!("OrchestrationFacade::new: called");
        let itinerary = Arc::clone(&providers.itinerary);

        Self {
            aggregator: TripAggregator::new(providers, config),
            itinerary,
            sessions: SessionManager::new(),
            store,
        }
    }

    /// Plan a trip for a user
    ///
    /// Validates the request, aggregates the four sections, points the
    /// user's session at the new record, and upserts the trip fact. The
    /// upsert may fail without failing the plan.
    pub async fn plan_trip(&self, user_id: &str, request: TripRequest) -> Result<PlannedTrip, PlanError> {
        info!(%user_id, city = %request.city, "plan_trip: called");
        validate_request(&request)?;

        let record = Arc::new(self.aggregator.plan(user_id, request).await);

        let session = self.sessions.open(user_id).await;
        session.lock().await.set_current_trip(record.clone());

        let store_status = match self.store.upsert(&record.to_fact()).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, trip_id = %record.trip_id, "plan_trip: trip fact upsert failed");
                Err(e)
            }
        };

        info!(trip_id = %record.trip_id, planned = %record.is_planned(), "plan_trip: record assembled");
        Ok(PlannedTrip { record, store_status })
    }

    /// Continue the conversation for a user with an open session
    ///
    /// The user turn is recorded before generation, so a failed generation
    /// still leaves the question in the transcript. The assistant turn is
    /// appended only when text came back.
    pub async fn continue_conversation(&self, user_id: &str, message: &str) -> Result<String, PlanError> {
        info!(%user_id, "continue_conversation: called");
        let session = self
            .sessions
            .get(user_id)
            .await
            .ok_or_else(|| PlanError::NoActiveSession(user_id.to_string()))?;

        let mut context = session.lock().await;

        let snapshot = context.build_context_snapshot();
        context.append_user_turn(message);

        let reply = self
            .itinerary
            .generate(ItineraryRequest::with_context(message, snapshot))
            .await?;

        context.append_assistant_turn(&reply);

        debug!(%user_id, turn_count = %context.history().len(), "continue_conversation: turn complete");
        Ok(reply)
    }

    /// Open a session for a user without planning anything
    pub async fn open_session(&self, user_id: &str) {
        self.sessions.open(user_id).await;
    }

    /// Terminate a user's session, dropping history and the trip reference
    ///
    /// Stored trip facts are unaffected. Returns true when a session existed.
    pub async fn close_session(&self, user_id: &str) -> bool {
        self.sessions.close(user_id).await
    }

    /// The user's current trip record, if their session has one
    pub async fn current_trip(&self, user_id: &str) -> Option<Arc<TripRecord>> {
        let session = self.sessions.get(user_id).await?;
        let trip = session.lock().await.current_trip();
        trip
    }

    /// Stored trips for a user, newest travel date first
    pub async fn trips_for_user(&self, user_id: &str) -> Result<Vec<TripFact>, StoreError> {
        debug!(%user_id, "trips_for_user: called");
        self.store.trips_for_user(user_id).await
    }
}

/// Reject requests that should never reach a provider
fn validate_request(request: &TripRequest) -> Result<(), PlanError> {
    if request.city.trim().is_empty() {
        return Err(PlanError::InvalidRequest("city must not be blank".to_string()));
    }
    if request.interests.is_empty() {
        return Err(PlanError::InvalidRequest("interests must not be empty".to_string()));
    }
    if !(request.budget > 0.0) {
        return Err(PlanError::InvalidRequest("budget must be positive".to_string()));
    }
    Ok(())
}
