//! Weather provider client
//!
//! Implements the WeatherClient trait against the OpenWeatherMap current
//! weather API. The city is passed as a query parameter and metric units
//! are requested so temperatures arrive in Celsius.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::WeatherConfig;
use crate::domain::{ProviderFailure, ProviderResult, WeatherReport};

/// Current-conditions lookup for a destination city
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Fetch current weather for a city
    async fn fetch_weather(&self, city: &str) -> ProviderResult<WeatherReport>;
}

/// OpenWeatherMap API client
pub struct OpenWeatherClient {
    endpoint: String,
    api_key: Option<String>,
    http: Client,
}

impl OpenWeatherClient {
    /// Create a new client from configuration
    ///
    /// A missing API key is not an error here. The key is checked per call
    /// so one unconfigured provider degrades its own section only.
    pub fn from_config(config: &WeatherConfig) -> Result<Self, ProviderFailure> {
        debug!(endpoint = %config.endpoint, "OpenWeatherClient::from_config: called");
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

    /// Map the API response onto a weather report
    fn parse_response(&self, api_response: WeatherResponse) -> ProviderResult<WeatherReport> {
        debug!("OpenWeatherClient::parse_response: called");
        let description = api_response
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or_else(|| ProviderFailure::malformed("weather response has no conditions entry"))?;

        Ok(WeatherReport {
            temperature_c: api_response.main.temp,
            feels_like_c: api_response.main.feels_like,
            humidity_pct: api_response.main.humidity,
            description,
        })
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn fetch_weather(&self, city: &str) -> ProviderResult<WeatherReport> {
        debug!(%city, "OpenWeatherClient::fetch_weather: called");
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderFailure::upstream_unavailable("weather API key not set"))?;

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderFailure::upstream_unavailable("weather request timed out")
                } else {
                    ProviderFailure::upstream_unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "OpenWeatherClient::fetch_weather: API error");
            return Err(ProviderFailure::upstream_unavailable(format!(
                "weather API returned {status}"
            )));
        }

        let api_response: WeatherResponse = response
            .json()
            .await
            .map_err(|e| ProviderFailure::malformed(e.to_string()))?;

        self.parse_response(api_response)
    }
}

// OpenWeatherMap API response types

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: WeatherMain,
    weather: Vec<WeatherCondition>,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    description: String,
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Mock weather client for unit tests
    pub struct MockWeatherClient {
        outcomes: Vec<ProviderResult<WeatherReport>>,
        call_count: AtomicUsize,
    }

    impl MockWeatherClient {
        pub fn new(outcomes: Vec<ProviderResult<WeatherReport>>) -> Self {
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
    impl WeatherClient for MockWeatherClient {
        async fn fetch_weather(&self, city: &str) -> ProviderResult<WeatherReport> {
            debug!(%city, "MockWeatherClient::fetch_weather: called");
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .get(idx)
                .cloned()
                .unwrap_or_else(|| Err(ProviderFailure::malformed("no more mock outcomes")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenWeatherClient {
        OpenWeatherClient {
            endpoint: "http://weather.test/lookup".to_string(),
            api_key: Some("test-key".to_string()),
            http: Client::new(),
        }
    }

    #[test]
    fn test_parse_response() {
        let json = r#"{
            "main": {"temp": 22.0, "feels_like": 21.0, "humidity": 55},
            "weather": [{"description": "clear sky"}]
        }"#;
        let api_response: WeatherResponse = serde_json::from_str(json).unwrap();

        let report = client().parse_response(api_response).unwrap();

        assert_eq!(report.temperature_c, 22.0);
        assert_eq!(report.feels_like_c, 21.0);
        assert_eq!(report.humidity_pct, 55);
        assert_eq!(report.description, "clear sky");
    }

    #[test]
    fn test_parse_response_first_condition_wins() {
        let json = r#"{
            "main": {"temp": 8.5, "feels_like": 6.1, "humidity": 80},
            "weather": [{"description": "light rain"}, {"description": "mist"}]
        }"#;
        let api_response: WeatherResponse = serde_json::from_str(json).unwrap();

        let report = client().parse_response(api_response).unwrap();
        assert_eq!(report.description, "light rain");
    }

    #[test]
    fn test_parse_response_missing_conditions() {
        let json = r#"{
            "main": {"temp": 22.0, "feels_like": 21.0, "humidity": 55},
            "weather": []
        }"#;
        let api_response: WeatherResponse = serde_json::from_str(json).unwrap();

        let err = client().parse_response(api_response).unwrap_err();
        assert_eq!(err.kind, crate::domain::FailureKind::MalformedResponse);
    }

    #[test]
    fn test_missing_fields_fail_deserialization() {
        let json = r#"{"weather": [{"description": "clear sky"}]}"#;
        let result: Result<WeatherResponse, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mock_client_returns_outcomes_in_order() {
        use mock::MockWeatherClient;

        let report = WeatherReport {
            temperature_c: 22.0,
            feels_like_c: 21.0,
            humidity_pct: 55,
            description: "clear sky".to_string(),
        };
        let client = MockWeatherClient::new(vec![
            Ok(report.clone()),
            Err(ProviderFailure::upstream_unavailable("down")),
        ]);

        assert_eq!(client.fetch_weather("Rome").await.unwrap(), report);
        assert!(client.fetch_weather("Rome").await.is_err());
        assert_eq!(client.call_count(), 2);
    }
}
