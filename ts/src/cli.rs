//! CLI argument parsing for tripstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ts")]
#[command(author, version, about = "Graph-backed trip fact store", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check connectivity to the graph backend
    Ping,

    /// Upsert a trip fact from a JSON file
    Upsert {
        /// Path to a JSON-encoded trip fact
        #[arg(required = true)]
        file: PathBuf,
    },

    /// List trips stored for a user, newest first
    Trips {
        /// User id to list trips for
        #[arg(short, long, required = true)]
        user: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ping() {
        let cli = Cli::parse_from(["ts", "ping"]);
        assert!(matches!(cli.command, Command::Ping));
    }

    #[test]
    fn test_parse_upsert_with_config() {
        let cli = Cli::parse_from(["ts", "--config", "custom.yml", "upsert", "trip.json"]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.yml")));
        match cli.command {
            Command::Upsert { file } => assert_eq!(file, PathBuf::from("trip.json")),
            _ => panic!("expected upsert"),
        }
    }

    #[test]
    fn test_parse_trips_requires_user() {
        assert!(Cli::try_parse_from(["ts", "trips"]).is_err());
        let cli = Cli::parse_from(["ts", "trips", "--user", "mia"]);
        match cli.command {
            Command::Trips { user } => assert_eq!(user, "mia"),
            _ => panic!("expected trips"),
        }
    }
}
