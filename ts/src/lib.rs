//! TripStore - graph-backed trip fact persistence
//!
//! Persists planned trips as a small graph: a User node per user, a Trip node
//! per planned trip, and a PLANNED relation between them. Writes are
//! idempotent upserts keyed by (user, trip identity) - repeating a write
//! never duplicates nodes or relations, it overwrites the scalar properties.
//!
//! # Shape
//!
//! ```text
//! (:User {id})-[:PLANNED]->(:Trip {city, date, trip_id,
//!                                  budget, interests, itinerary})
//! ```
//!
//! # Example
//!
//! ```ignore
//! use tripstore::{InMemoryStore, TripFact, TripStore};
//!
//! let store = InMemoryStore::new();
//! store.upsert(&fact).await?;
//! let trips = store.trips_for_user("mia").await?;
//! ```

pub mod cli;
pub mod config;
mod neo4j;
mod store;

pub use neo4j::Neo4jStore;
pub use store::{InMemoryStore, StoreError, TripFact, TripStore};

/// Relation type between a User node and the Trip nodes they planned
pub const PLANNED_RELATION: &str = "PLANNED";
