//! Routing provider client
//!
//! Implements the RoutingClient trait against an OpenRouteService-style
//! directions endpoint. The request is a POST carrying origin and
//! destination; the response yields one or more candidate routes of which
//! the first is summarized.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::RoutingConfig;
use crate::domain::{ProviderFailure, ProviderResult, RouteSummary};

/// Directions lookup between two cities
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Fetch a driving route from origin to destination
    async fn fetch_route(&self, origin: &str, destination: &str) -> ProviderResult<RouteSummary>;
}

/// OpenRouteService API client
pub struct OpenRouteClient {
    endpoint: String,
    api_key: Option<String>,
    http: Client,
}

impl OpenRouteClient {
    /// Create a new client from configuration
    pub fn from_config(config: &RoutingConfig) -> Result<Self, ProviderFailure> {
        debug!(endpoint = %config.endpoint, "OpenRouteClient::from_config: called");
        let api_key = std::env::var(&config.api_key_env).ok();

        let timeout = Duration::from_millis(config.timeout_ms);

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderFailure::upstream_unavailable(e.to_string()))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key,
            http,
        })
    }

    /// Summarize the first candidate route
    ///
    /// An empty candidate list means the upstream answered but found no way
    /// to connect the two cities.
    fn parse_response(&self, api_response: RouteResponse) -> ProviderResult<RouteSummary> {
        debug!(
            route_count = %api_response.routes.len(),
            "OpenRouteClient::parse_response: called"
        );
        let route = api_response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| ProviderFailure::no_route("no route between origin and destination"))?;

        let steps = route
            .segments
            .into_iter()
            .flat_map(|s| s.steps)
            .map(|s| s.instruction)
            .collect();

        Ok(RouteSummary {
            distance_meters: route.summary.distance,
            duration_seconds: route.summary.duration,
            steps,
        })
    }
}

#[async_trait]
impl RoutingClient for OpenRouteClient {
    async fn fetch_route(&self, origin: &str, destination: &str) -> ProviderResult<RouteSummary> {
        debug!(%origin, %destination, "OpenRouteClient::fetch_route: called");
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderFailure::upstream_unavailable("routing API key not set"))?;

        let body = serde_json::json!({
            "origin": origin,
            "destination": destination,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderFailure::upstream_unavailable("routing request timed out")
                } else {
                    ProviderFailure::upstream_unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "OpenRouteClient::fetch_route: API error");
            return Err(ProviderFailure::upstream_unavailable(format!(
                "routing API returned {status}"
            )));
        }

        let api_response: RouteResponse = response
            .json()
            .await
            .map_err(|e| ProviderFailure::malformed(e.to_string()))?;

        self.parse_response(api_response)
    }
}

// OpenRouteService API response types

#[derive(Debug, Deserialize)]
struct RouteResponse {
    routes: Vec<RouteCandidate>,
}

#[derive(Debug, Deserialize)]
struct RouteCandidate {
    summary: RouteCandidateSummary,
    #[serde(default)]
    segments: Vec<RouteSegment>,
}

#[derive(Debug, Deserialize)]
struct RouteCandidateSummary {
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct RouteSegment {
    #[serde(default)]
    steps: Vec<RouteStep>,
}

#[derive(Debug, Deserialize)]
struct RouteStep {
    instruction: String,
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Mock routing client for unit tests
    pub struct MockRoutingClient {
        outcomes: Vec<ProviderResult<RouteSummary>>,
        call_count: AtomicUsize,
    }

    impl MockRoutingClient {
        pub fn new(outcomes: Vec<ProviderResult<RouteSummary>>) -> Self {
            Self {
                outcomes,
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RoutingClient for MockRoutingClient {
        async fn fetch_route(&self, origin: &str, destination: &str) -> ProviderResult<RouteSummary> {
            debug!(%origin, %destination, "MockRoutingClient::fetch_route: called");
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .get(idx)
                .cloned()
                .unwrap_or_else(|| Err(ProviderFailure::malformed("no more mock outcomes")))
        }
    }
}
