//! Store trait, fact projection, and the in-memory backend

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store cannot be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// The store answered but the exchange failed
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// The persisted projection of one planned trip.
///
/// A fact maps onto the graph as a User node keyed by `user_id`, a Trip node
/// keyed by `(city, date, trip_id)`, a PLANNED relation, and the scalar
/// properties `budget`, `interests`, `itinerary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripFact {
    /// Owning user id
    pub user_id: String,
    /// Unique trip id, generated once per planned trip
    pub trip_id: String,
    /// Destination city
    pub city: String,
    /// Trip date
    pub date: NaiveDate,
    /// Budget in the user's currency
    pub budget: f64,
    /// Interest tags, order preserved
    pub interests: Vec<String>,
    /// Generated itinerary text, empty when generation failed
    pub itinerary: String,
}

impl TripFact {
    /// Identity key for merge semantics
    pub fn key(&self) -> (String, String) {
        (self.user_id.clone(), self.trip_id.clone())
    }
}

/// The storage trait the orchestration engine delegates to.
///
/// Implementations:
/// - `Neo4jStore` - the production graph backend
/// - `InMemoryStore` - testing and offline use, same merge semantics
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Idempotent upsert keyed by (user_id, trip_id). Repeating the call
    /// with changed scalar fields overwrites them - last write wins.
    async fn upsert(&self, fact: &TripFact) -> Result<(), StoreError>;

    /// All trips planned by a user, newest trip date first.
    async fn trips_for_user(&self, user_id: &str) -> Result<Vec<TripFact>, StoreError>;

    /// Connectivity check.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Keyed map with the same merge semantics as the graph backend.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    facts: RwLock<HashMap<(String, String), TripFact>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored facts across all users.
    pub async fn len(&self) -> usize {
        self.facts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.facts.read().await.is_empty()
    }
}

#[async_trait]
impl TripStore for InMemoryStore {
    async fn upsert(&self, fact: &TripFact) -> Result<(), StoreError> {
        let mut facts = self.facts.write().await;
        facts.insert(fact.key(), fact.clone());
        Ok(())
    }

    async fn trips_for_user(&self, user_id: &str) -> Result<Vec<TripFact>, StoreError> {
        let facts = self.facts.read().await;
        let mut trips: Vec<TripFact> = facts
            .values()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        trips.sort_by(|a, b| b.date.cmp(&a.date).then(a.trip_id.cmp(&b.trip_id)));
        Ok(trips)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
