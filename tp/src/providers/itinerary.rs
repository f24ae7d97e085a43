//! Itinerary generation client
//!
//! Implements the ItineraryClient trait against the OpenAI Chat Completions
//! API. One request produces one block of itinerary or conversation text.
//! Retry policy lives with the caller, not here: a timed-out generation is
//! reported as such and the aggregator decides whether to try again.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::ItineraryConfig;
use crate::domain::{ContextSnapshot, ProviderFailure, ProviderResult, Role, TripRecord, TripRequest};

/// System prompt for all generation calls
const SYSTEM_PROMPT: &str = "You are a travel planning assistant. Produce concise, \
                             hour-by-hour day plans that respect the traveler's \
                             interests and budget.";

/// A single generation request
///
/// `context` carries the conversation snapshot for follow-up turns. How that
/// snapshot becomes provider messages is this module's concern; callers hand
/// over the structured value and nothing else. Fresh plans leave it empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryRequest {
    pub prompt: String,
    pub context: Option<ContextSnapshot>,
}

impl ItineraryRequest {
    /// Build the day-plan prompt for a trip request
    pub fn for_trip(request: &TripRequest) -> Self {
        debug!(city = %request.city, "ItineraryRequest::for_trip: called");
        let prompt = format!(
            "Plan a one-day itinerary for {} on {}. Traveler interests: {}. Budget: {} USD. \
             Lay out the day hour by hour.",
            request.city,
            request.date,
            request.interests.join(", "),
            request.budget,
        );

        Self { prompt, context: None }
    }

    /// Build a follow-up request carrying conversation context
    pub fn with_context(prompt: impl Into<String>, context: ContextSnapshot) -> Self {
        Self {
            prompt: prompt.into(),
            context: Some(context),
        }
    }
}

/// Text generation for itineraries and follow-up conversation
#[async_trait]
pub trait ItineraryClient: Send + Sync {
    /// Generate itinerary or conversation text for a request
    async fn generate(&self, request: ItineraryRequest) -> ProviderResult<String>;
}

/// OpenAI API client
pub struct OpenAIClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl OpenAIClient {
    /// Create a new client from configuration
    ///
    /// Unlike the section providers, a missing key here is an error at
    /// construction time. A planner without its generator is not worth
    /// starting.
    pub fn from_config(config: &ItineraryConfig) -> Result<Self, ProviderFailure> {
        debug!(model = %config.model, "OpenAIClient::from_config: called");
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            ProviderFailure::generation_refused(format!(
                "itinerary API key not set; set {}",
                config.api_key_env
            ))
        })?;

        let timeout = Duration::from_millis(config.timeout_ms);

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderFailure::generation_refused(e.to_string()))?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the request body for the chat completions API
    ///
    /// The context snapshot is serialized here: trip facts become a second
    /// system message and history turns become role-tagged messages, so the
    /// generator sees the conversation the way the traveler had it.
    fn build_request_body(&self, request: &ItineraryRequest) -> serde_json::Value {
        debug!(model = %self.model, "OpenAIClient::build_request_body: called");

        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": SYSTEM_PROMPT,
        })];

        if let Some(context) = &request.context {
            if let Some(trip) = &context.current_trip {
                messages.push(serde_json::json!({
                    "role": "system",
                    "content": trip_summary(trip),
                }));
            }

            for turn in &context.history {
                let role = match turn.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                };
                messages.push(serde_json::json!({
                    "role": role,
                    "content": turn.content,
                }));
            }
        }

        messages.push(serde_json::json!({
            "role": "user",
            "content": request.prompt,
        }));

        serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": self.max_tokens,
        })
    }

    /// Pull the generated text out of the API response
    fn parse_response(&self, api_response: ChatResponse) -> ProviderResult<String> {
        debug!(choice_count = %api_response.choices.len(), "OpenAIClient::parse_response: called");
        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderFailure::malformed("generation response missing content"))
    }
}

#[async_trait]
impl ItineraryClient for OpenAIClient {
    async fn generate(&self, request: ItineraryRequest) -> ProviderResult<String> {
        debug!(model = %self.model, "OpenAIClient::generate: called");
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderFailure::generation_timeout("generation request timed out")
                } else {
                    ProviderFailure::generation_refused(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(%status, "OpenAIClient::generate: API error");
            return Err(ProviderFailure::generation_refused(format!(
                "generation API returned {status}: {text}"
            )));
        }

        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderFailure::malformed(e.to_string()))?;

        self.parse_response(api_response)
    }
}

/// Render the trip facts a follow-up turn should know about
fn trip_summary(trip: &TripRecord) -> String {
    let mut summary = format!(
        "The traveler's current trip: {} on {}. Interests: {}. Budget: {} USD.",
        trip.request.city,
        trip.request.date,
        trip.request.interests.join(", "),
        trip.request.budget,
    );

    if let Ok(itinerary) = &trip.itinerary {
        summary.push_str(" Planned itinerary: ");
        summary.push_str(itinerary);
    }

    summary
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}
