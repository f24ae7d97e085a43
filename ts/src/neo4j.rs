//! Bolt-backed graph store

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use neo4rs::{ConfigBuilder, Graph, query};

use crate::config::Config;
use crate::store::{StoreError, TripFact, TripStore};

/// Production backend. Every write is a MERGE keyed by node identity, so
/// repeated upserts converge on a single User node, Trip node, and relation.
pub struct Neo4jStore {
    graph: Graph,
}

impl Neo4jStore {
    /// Connect to the bolt endpoint described by `config`. The password is
    /// read from the environment variable named in `config.password_env`.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        debug!("Neo4jStore::connect: {}", config.uri);

        let password = std::env::var(&config.password_env).map_err(|_| {
            StoreError::Unavailable(format!(
                "environment variable {} is not set",
                config.password_env
            ))
        })?;

        let graph_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(password)
            .db(config.database.as_str())
            .build()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let graph = Graph::connect(graph_config)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(Self { graph })
    }
}

#[async_trait]
impl TripStore for Neo4jStore {
    async fn upsert(&self, fact: &TripFact) -> Result<(), StoreError> {
        debug!("Neo4jStore::upsert: {} for {}", fact.trip_id, fact.user_id);

        let cypher = format!(
            "MERGE (u:User {{id: $user_id}})
             MERGE (t:Trip {{city: $city, date: $date, trip_id: $trip_id}})
             MERGE (u)-[:{rel}]->(t)
             SET t.budget = $budget,
                 t.interests = $interests,
                 t.itinerary = $itinerary",
            rel = crate::PLANNED_RELATION
        );

        let q = query(&cypher)
            .param("user_id", fact.user_id.as_str())
            .param("city", fact.city.as_str())
            .param("date", fact.date.to_string())
            .param("trip_id", fact.trip_id.as_str())
            .param("budget", fact.budget)
            .param("interests", fact.interests.clone())
            .param("itinerary", fact.itinerary.as_str());

        self.graph
            .run(q)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn trips_for_user(&self, user_id: &str) -> Result<Vec<TripFact>, StoreError> {
        debug!("Neo4jStore::trips_for_user: {}", user_id);

        let cypher = format!(
            "MATCH (u:User {{id: $user_id}})-[:{rel}]->(t:Trip)
             RETURN t.city AS city, t.date AS date, t.trip_id AS trip_id,
                    t.budget AS budget, t.interests AS interests,
                    t.itinerary AS itinerary
             ORDER BY t.date DESC, t.trip_id",
            rel = crate::PLANNED_RELATION
        );

        let q = query(&cypher).param("user_id", user_id);

        let mut stream = self
            .graph
            .execute(q)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let mut trips = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
        {
            let date_str: String = row
                .get("date")
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                .map_err(|e| StoreError::Backend(format!("bad date property: {e}")))?;

            trips.push(TripFact {
                user_id: user_id.to_string(),
                trip_id: row
                    .get("trip_id")
                    .map_err(|e| StoreError::Backend(e.to_string()))?,
                city: row
                    .get("city")
                    .map_err(|e| StoreError::Backend(e.to_string()))?,
                date,
                budget: row
                    .get("budget")
                    .map_err(|e| StoreError::Backend(e.to_string()))?,
                interests: row.get("interests").unwrap_or_default(),
                itinerary: row.get("itinerary").unwrap_or_default(),
            });
        }

        Ok(trips)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut stream = self
            .graph
            .execute(query("RETURN 1 AS ok"))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        while stream
            .next()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .is_some()
        {}
        Ok(())
    }
}
