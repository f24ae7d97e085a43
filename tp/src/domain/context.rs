//! Conversation context snapshot

use std::sync::Arc;

use crate::domain::{ConversationTurn, TripRecord};

/// Point-in-time view of a conversation
///
/// A structured copy of the session state handed to provider adapters.
/// Adapters decide how to serialize it into their own message formats;
/// nothing here is prompt text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextSnapshot {
    /// Turns so far, oldest first
    pub history: Vec<ConversationTurn>,

    /// The most recently planned trip, if any
    pub current_trip: Option<Arc<TripRecord>>,
}

impl ContextSnapshot {
    /// True when there is nothing to carry into a generation call
    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.current_trip.is_none()
    }
}
