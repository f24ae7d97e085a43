//! TripPlanner configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main TripPlanner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provider endpoints and timeouts
    pub providers: ProvidersConfig,

    /// Planning behavior
    pub planning: PlanningConfig,

    /// Graph store connection
    pub store: StoreConfig,

    /// Log level (DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before use
    ///
    /// The itinerary provider is the one capability a plan cannot degrade
    /// around, so its key is checked early for a clear startup error. The
    /// other providers fail per-section at call time.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.providers.itinerary.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "Itinerary API key not found. Set the {} environment variable.",
                self.providers.itinerary.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .tripplanner.yml
        let local_config = PathBuf::from(".tripplanner.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/tripplanner/tripplanner.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("tripplanner").join("tripplanner.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level, for use before logging is initialized
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok()?.log_level
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Provider endpoints, keys, and shared call policy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub weather: WeatherConfig,
    pub news: NewsConfig,
    pub routing: RoutingConfig,
    pub itinerary: ItineraryConfig,
}

/// Weather provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Lookup endpoint, city passed as a query parameter
    pub endpoint: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://api.openweathermap.org/data/2.5/weather".to_string(),
            api_key_env: "OPENWEATHER_API_KEY".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// News provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    /// Top-headlines endpoint
    pub endpoint: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://newsapi.org/v2/top-headlines".to_string(),
            api_key_env: "NEWS_API_KEY".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Routing provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Directions endpoint
    pub endpoint: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openrouteservice.org/v2/directions/driving-car".to_string(),
            api_key_env: "ORS_API_KEY".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Itinerary generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ItineraryConfig {
    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// How many times a timed-out generation is retried
    #[serde(rename = "retry-count")]
    pub retry_count: u32,
}

impl Default for ItineraryConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 1024,
            timeout_ms: 30_000,
            retry_count: 1,
        }
    }
}

/// Planning behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// Starting city for the route section of a plan
    #[serde(rename = "default-origin")]
    pub default_origin: String,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            default_origin: "San Francisco".to_string(),
        }
    }
}

/// Graph store connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Bolt endpoint
    pub uri: String,

    /// Database user
    pub user: String,

    /// Environment variable containing the database password
    #[serde(rename = "password-env")]
    pub password_env: String,

    /// Database name
    pub database: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: "127.0.0.1:7687".to_string(),
            user: "neo4j".to_string(),
            password_env: "NEO4J_PASSWORD".to_string(),
            database: "neo4j".to_string(),
        }
    }
}

impl StoreConfig {
    /// Convert to the store crate's connection config
    pub fn to_store_config(&self) -> tripstore::config::Config {
        tripstore::config::Config {
            uri: self.uri.clone(),
            user: self.user.clone(),
            password_env: self.password_env.clone(),
            database: self.database.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.providers.itinerary.model, "gpt-4o-mini");
        assert_eq!(config.providers.itinerary.retry_count, 1);
        assert_eq!(config.planning.default_origin, "San Francisco");
        assert_eq!(config.store.uri, "127.0.0.1:7687");
    }

    #[test]
    fn test_weather_config_defaults() {
        let config = WeatherConfig::default();

        assert!(config.endpoint.contains("openweathermap.org"));
        assert_eq!(config.api_key_env, "OPENWEATHER_API_KEY");
        assert_eq!(config.timeout_ms, 10_000);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
providers:
  weather:
    endpoint: http://weather.internal/lookup
    api-key-env: MY_WEATHER_KEY
    timeout-ms: 5000
  itinerary:
    model: gpt-4o
    api-key-env: MY_OPENAI_KEY
    base-url: https://llm.internal
    max-tokens: 2048
    timeout-ms: 60000
    retry-count: 2

planning:
  default-origin: Lisbon

store:
  uri: bolt.internal:7687
  password-env: GRAPH_PASSWORD
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.providers.weather.endpoint, "http://weather.internal/lookup");
        assert_eq!(config.providers.weather.api_key_env, "MY_WEATHER_KEY");
        assert_eq!(config.providers.weather.timeout_ms, 5000);
        assert_eq!(config.providers.itinerary.model, "gpt-4o");
        assert_eq!(config.providers.itinerary.max_tokens, 2048);
        assert_eq!(config.providers.itinerary.retry_count, 2);
        assert_eq!(config.planning.default_origin, "Lisbon");
        assert_eq!(config.store.uri, "bolt.internal:7687");
        assert_eq!(config.store.password_env, "GRAPH_PASSWORD");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
providers:
  news:
    endpoint: https://news.internal/headlines
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.providers.news.endpoint, "https://news.internal/headlines");

        // Defaults for unspecified
        assert_eq!(config.providers.news.api_key_env, "NEWS_API_KEY");
        assert_eq!(config.providers.routing.api_key_env, "ORS_API_KEY");
        assert_eq!(config.planning.default_origin, "San Francisco");
    }

    #[test]
    fn test_store_config_conversion() {
        let mut config = StoreConfig::default();
        config.database = "trips".to_string();

        let store = config.to_store_config();
        assert_eq!(store.uri, "127.0.0.1:7687");
        assert_eq!(store.database, "trips");
    }

    #[test]
    fn test_validate_fails_without_itinerary_key() {
        let mut config = Config::default();
        config.providers.itinerary.api_key_env = "TP_TEST_KEY_THAT_IS_NEVER_SET".to_string();

        assert!(config.validate().is_err());
    }

    // ====== File loading ======

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tripplanner.yml");
        fs::write(&path, "planning:\n  default-origin: Porto\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.planning.default_origin, "Porto");
    }

    #[test]
    fn test_load_explicit_path_missing_fails() {
        let path = PathBuf::from("/nonexistent/tripplanner.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_log_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tripplanner.yml");
        fs::write(&path, "log-level: DEBUG\n").unwrap();

        assert_eq!(Config::load_log_level(Some(&path)), Some("DEBUG".to_string()));
    }

    #[test]
    fn test_log_level_absent_by_default() {
        assert_eq!(Config::default().log_level, None);
    }
}
