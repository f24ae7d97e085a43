//! ConversationContext - one user's session state

use std::sync::Arc;

use tracing::debug;

use crate::domain::{ContextSnapshot, ConversationTurn, TripRecord};

/// Session state for a single user
///
/// History is append-only: turns go in through the two append methods and
/// insertion order is the transcript order. The current trip is a shared
/// reference to the latest record; the context never owns or mutates the
/// record itself.
#[derive(Debug)]
pub struct ConversationContext {
    user_id: String,
    history: Vec<ConversationTurn>,
    current_trip: Option<Arc<TripRecord>>,
}

impl ConversationContext {
    /// Create an empty context for a user
    pub fn new(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        debug!(%user_id, "ConversationContext::new: called");
        Self {
            user_id,
            history: Vec::new(),
            current_trip: None,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Append a traveler turn to the history
    pub fn append_user_turn(&mut self, content: impl Into<String>) {
        self.history.push(ConversationTurn::user(content));
    }

    /// Append an assistant turn to the history
    pub fn append_assistant_turn(&mut self, content: impl Into<String>) {
        self.history.push(ConversationTurn::assistant(content));
    }

    /// Point the context at a newly planned trip
    pub fn set_current_trip(&mut self, record: Arc<TripRecord>) {
        debug!(user_id = %self.user_id, trip_id = %record.trip_id, "ConversationContext::set_current_trip: called");
        self.current_trip = Some(record);
    }

    pub fn current_trip(&self) -> Option<Arc<TripRecord>> {
        self.current_trip.clone()
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    /// Copy the session state into a structured snapshot
    ///
    /// The snapshot is what provider adapters consume; handing out a copy
    /// keeps them off the live session.
    pub fn build_context_snapshot(&self) -> ContextSnapshot {
        debug!(
            user_id = %self.user_id,
            turn_count = %self.history.len(),
            "ConversationContext::build_context_snapshot: called"
        );
        ContextSnapshot {
            history: self.history.clone(),
            current_trip: self.current_trip.clone(),
        }
    }
}
