//! Configuration for tripstore

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bolt endpoint of the graph database
    #[serde(default = "default_uri")]
    pub uri: String,

    /// Database user
    #[serde(default = "default_user")]
    pub user: String,

    /// Name of the environment variable holding the database password
    #[serde(rename = "password-env", default = "default_password_env")]
    pub password_env: String,

    /// Database name
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_uri() -> String {
    "127.0.0.1:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_password_env() -> String {
    "NEO4J_PASSWORD".to_string()
}

fn default_database() -> String {
    "neo4j".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password_env: default_password_env(),
            database: default_database(),
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            return Ok(config);
        }

        // Try default locations
        let default_paths = [
            Some(PathBuf::from("tripstore.yml")),
            dirs::config_dir().map(|p| p.join("tripstore").join("config.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Config::default())
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.uri, "127.0.0.1:7687");
        assert_eq!(config.user, "neo4j");
        assert_eq!(config.password_env, "NEO4J_PASSWORD");
        assert_eq!(config.database, "neo4j");
    }

    #[test]
    fn test_partial_yaml_falls_back_per_field() {
        let config: Config = serde_yaml::from_str("uri: bolt.internal:7687\n").unwrap();
        assert_eq!(config.uri, "bolt.internal:7687");
        assert_eq!(config.user, "neo4j");
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "uri: graph.example:7687\nuser: trips\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.uri, "graph.example:7687");
        assert_eq!(config.user, "trips");
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");

        let mut config = Config::default();
        config.database = "trips".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.database, "trips");
    }
}
