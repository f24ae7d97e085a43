//! News provider client
//!
//! Implements the NewsClient trait against the NewsAPI top-headlines
//! endpoint. Headlines come back in upstream order and are capped at the
//! requested limit; a quiet news day with zero articles is a valid result,
//! not a failure.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::NewsConfig;
use crate::domain::{Headline, ProviderFailure, ProviderResult};

/// Top-headlines lookup for trip context
#[async_trait]
pub trait NewsClient: Send + Sync {
    /// Fetch up to `limit` current headlines
    async fn fetch_top_news(&self, limit: usize) -> ProviderResult<Vec<Headline>>;
}

/// NewsAPI client
pub struct NewsApiClient {
    endpoint: String,
    api_key: Option<String>,
    http: Client,
}

impl NewsApiClient {
    /// Create a new client from configuration
    pub fn from_config(config: &NewsConfig) -> Result<Self, ProviderFailure> {
        debug!(endpoint = %config.endpoint, "NewsApiClient::from_config: called");
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

    /// Map the API response onto headlines, capped at `limit`
    ///
    /// Upstream order is preserved. A missing description becomes an empty
    /// string rather than poisoning the whole batch.
    fn parse_response(&self, api_response: NewsResponse, limit: usize) -> Vec<Headline> {
        debug!(
            article_count = %api_response.articles.len(),
            %limit,
            "NewsApiClient::parse_response: called"
        );
        api_response
            .articles
            .into_iter()
            .take(limit)
            .map(|a| Headline {
                title: a.title,
                description: a.description.unwrap_or_default(),
                url: a.url,
            })
            .collect()
    }
}

#[async_trait]
impl NewsClient for NewsApiClient {
    async fn fetch_top_news(&self, limit: usize) -> ProviderResult<Vec<Headline>> {
        debug!(%limit, "NewsApiClient::fetch_top_news: called");
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderFailure::upstream_unavailable("news API key not set"))?;

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("pageSize", limit.to_string().as_str()), ("apiKey", api_key)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderFailure::upstream_unavailable("news request timed out")
                } else {
                    ProviderFailure::upstream_unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "NewsApiClient::fetch_top_news: API error");
            return Err(ProviderFailure::upstream_unavailable(format!(
                "news API returned {status}"
            )));
        }

        let api_response: NewsResponse = response
            .json()
            .await
            .map_err(|e| ProviderFailure::malformed(e.to_string()))?;

        Ok(self.parse_response(api_response, limit))
    }
}

// NewsAPI response types

#[derive(Debug, Deserialize)]
struct NewsResponse {
    articles: Vec<NewsArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsArticle {
    title: String,
    description: Option<String>,
    url: String,
}


#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> NewsApiClient {
        NewsApiClient {
            endpoint: "https://news.test/headlines".to_string(),
            api_key: Some("test-key".to_string()),
            http: Client::new(),
        }
    }

    fn article_json(n: usize) -> String {
        format!(
            r#"{{"title": "Headline {n}", "description": "Story {n}", "url": "https://news.test/{n}"}}"#
        )
    }

    #[test]
    fn test_parse_response_preserves_order() {
        let articles: Vec<String> = (1..=3).map(article_json).collect();
        let json = format!(r#"{{"articles": [{}]}}"#, articles.join(","));
        let api_response: NewsResponse = serde_json::from_str(&json).unwrap();

        let headlines = client().parse_response(api_response, 5);

        assert_eq!(headlines.len(), 3);
        assert_eq!(headlines[0].title, "Headline 1");
        assert_eq!(headlines[2].title, "Headline 3");
    }

    #[test]
    fn test_parse_response_caps_at_limit() {
        let articles: Vec<String> = (1..=8).map(article_json).collect();
        let json = format!(r#"{{"articles": [{}]}}"#, articles.join(","));
        let api_response: NewsResponse = serde_json::from_str(&json).unwrap();

        let headlines = client().parse_response(api_response, 5);

        assert_eq!(headlines.len(), 5);
        assert_eq!(headlines[0].title, "Headline 1");
        assert_eq!(headlines[4].title, "Headline 5");
    }

    #[test]
    fn test_parse_response_empty_is_ok() {
        let api_response: NewsResponse = serde_json::from_str(r#"{"articles": []}"#).unwrap();

        let headlines = client().parse_response(api_response, 5);
        assert!(headlines.is_empty());
    }

    #[test]
    fn test_parse_response_null_description() {
        let json = r#"{"articles": [{"title": "Quake", "description": null, "url": "https://news.test/q"}]}"#;
        let api_response: NewsResponse = serde_json::from_str(json).unwrap();

        let headlines = client().parse_response(api_response, 5);
        assert_eq!(headlines[0].description, "");
    }

    #[tokio::test]
    async fn test_mock_client_counts_calls() {
        use mock::MockNewsClient;

        let client = MockNewsClient::new(vec![Ok(vec![])]);
        assert!(client.fetch_top_news(5).await.unwrap().is_empty());
        assert_eq!(client.call_count(), 1);
    }
}
