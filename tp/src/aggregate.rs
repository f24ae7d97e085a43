//! Concurrent trip aggregation
//!
//! Fans the four provider calls out as tokio tasks, waits for all of them,
//! and assembles whatever came back into an immutable TripRecord. A failed
//! section is recorded as its failure; it never takes the other sections
//! down with it.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Config;
use crate::domain::{ProviderFailure, TripRecord, TripRequest, now_ms};
use crate::providers::{ItineraryRequest, Providers};

/// How many headlines a trip record carries
const NEWS_LIMIT: usize = 5;

/// Concurrent planner for a single trip request
///
/// The only section with a retry policy is itinerary generation: a timed-out
/// generation is tried again, and nothing else is ever retried. The weather,
/// news, and route sections get exactly one shot each.
pub struct TripAggregator {
    providers: Providers,
    default_origin: String,
    retry_count: u32,
}

impl TripAggregator {
    /// Create an aggregator from provider clients and configuration
    pub fn new(providers: Providers, config: &Config) -> Self {
        debug!(
            default_origin = %config.planning.default_origin,
            retry_count = %config.providers.itinerary.retry_count,
            "TripAggregator::new: called"
        );
        Self {
            providers,
            default_origin: config.planning.default_origin.clone(),
            retry_count: config.providers.itinerary.retry_count,
        }
    }

    /// Plan a trip by aggregating all four sections concurrently
    ///
    /// Always produces a record. `created_at` is stamped the moment the
    /// itinerary outcome is known, before the record is assembled.
    pub async fn plan(&self, user_id: &str, request: TripRequest) -> TripRecord {
        debug!(%user_id, city = %request.city, "TripAggregator::plan: called");

        let weather_handle = tokio::spawn({
            let client = Arc::clone(&self.providers.weather);
            let city = request.city.clone();
            async move { client.fetch_weather(&city).await }
        });

        let news_handle = tokio::spawn({
            let client = Arc::clone(&self.providers.news);
            async move {
                client.fetch_top_news(NEWS_LIMIT).await.map(|mut headlines| {
                    headlines.truncate(NEWS_LIMIT);
                    headlines
                })
            }
        });

        let route_handle = tokio::spawn({
            let client = Arc::clone(&self.providers.routing);
            let origin = self.default_origin.clone();
            let destination = request.city.clone();
            async move { client.fetch_route(&origin, &destination).await }
        });

        let itinerary_handle = tokio::spawn({
            let client = Arc::clone(&self.providers.itinerary);
            let generation = ItineraryRequest::for_trip(&request);
            let retry_count = self.retry_count;
            async move {
                let mut outcome = client.generate(generation.clone()).await;

                let mut attempt = 0;
                while attempt < retry_count && matches!(&outcome, Err(e) if e.is_generation_timeout()) {
                    attempt += 1;
                    warn!(%attempt, "plan: generation timed out, retrying");
                    outcome = client.generate(generation.clone()).await;
                }

                outcome
            }
        });

        let itinerary = itinerary_handle
            .await
            .unwrap_or_else(|e| Err(ProviderFailure::generation_refused(format!("generation task failed: {e}"))));
        let created_at = now_ms();

        let weather = weather_handle
            .await
            .unwrap_or_else(|e| Err(ProviderFailure::upstream_unavailable(format!("weather task failed: {e}"))));
        let news = news_handle
            .await
            .unwrap_or_else(|e| Err(ProviderFailure::upstream_unavailable(format!("news task failed: {e}"))));
        let route = route_handle
            .await
            .unwrap_or_else(|e| Err(ProviderFailure::upstream_unavailable(format!("route task failed: {e}"))));

        if let Err(e) = &weather {
            warn!(error = %e, "plan: weather section failed");
        }
        if let Err(e) = &news {
            warn!(error = %e, "plan: news section failed");
        }
        if let Err(e) = &route {
            warn!(error = %e, "plan: route section failed");
        }
        if let Err(e) = &itinerary {
            warn!(error = %e, "plan: itinerary section failed");
        }

        TripRecord::assemble(user_id, request, weather, news, route, itinerary, created_at)
    }
}
