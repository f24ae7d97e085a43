//! Upstream provider clients for TripPlanner
//!
//! One client per trip section: weather, news, routing, and itinerary
//! generation. Every client speaks to its upstream over HTTP and reports
//! outcomes as `ProviderResult` values so a dead upstream degrades a
//! single section instead of aborting the plan.

use std::sync::Arc;

use tracing::debug;

pub mod itinerary;
pub mod news;
pub mod routing;
pub mod weather;

pub use itinerary::{ItineraryClient, ItineraryRequest, OpenAIClient};
pub use news::{NewsApiClient, NewsClient};
pub use routing::{OpenRouteClient, RoutingClient};
pub use weather::{OpenWeatherClient, WeatherClient};

use crate::config::ProvidersConfig;
use crate::domain::ProviderFailure;

/// The full set of provider clients a planner needs
///
/// Built once at startup from config and shared behind `Arc`s so the
/// aggregator can fan calls out across tasks.
#[derive(Clone)]
pub struct Providers {
    pub weather: Arc<dyn WeatherClient>,
    pub news: Arc<dyn NewsClient>,
    pub routing: Arc<dyn RoutingClient>,
    pub itinerary: Arc<dyn ItineraryClient>,
}

impl Providers {
    /// Create all provider clients from configuration
    pub fn from_config(config: &ProvidersConfig) -> Result<Self, ProviderFailure> {
        debug!("Providers::from_config: called");

        Ok(Self {
            weather: Arc::new(OpenWeatherClient::from_config(&config.weather)?),
            news: Arc::new(NewsApiClient::from_config(&config.news)?),
            routing: Arc::new(OpenRouteClient::from_config(&config.routing)?),
            itinerary: Arc::new(OpenAIClient::from_config(&config.itinerary)?),
        })
    }
}
