//! Command-line interface

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// Day-trip planner CLI
#[derive(Parser)]
#[command(
    name = "tp",
    about = "Plan day trips from live weather, news, routes, and generated itineraries",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (DEBUG, INFO, WARN, ERROR)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Plan a one-day trip
    Plan {
        /// Destination city
        city: String,

        /// Trip date (YYYY-MM-DD)
        date: NaiveDate,

        /// Traveler interest, repeatable
        #[arg(short, long = "interest", value_name = "INTEREST", required = true)]
        interests: Vec<String>,

        /// Budget in USD
        #[arg(short, long)]
        budget: f64,

        /// User the trip belongs to
        #[arg(short, long, default_value = "local")]
        user: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Chat with the planner
    Chat {
        /// User the conversation belongs to
        #[arg(short, long, default_value = "local")]
        user: String,
    },

    /// List stored trips for a user
    Trips {
        /// User whose trips to list
        #[arg(short, long, default_value = "local")]
        user: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ====== Output format ======

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
    }

    #[test]
    fn test_output_format_rejects_unknown() {
        assert!(OutputFormat::from_str("yaml").is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Text.to_string(), "text");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    // ====== Argument parsing ======

    #[test]
    fn test_parse_plan() {
        let cli = Cli::parse_from([
            "tp", "plan", "Rome", "2025-06-01", "-i", "Art", "-i", "Food", "-b", "200",
        ]);

        match cli.command {
            Command::Plan {
                city,
                date,
                interests,
                budget,
                user,
                format,
            } => {
                assert_eq!(city, "Rome");
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
                assert_eq!(interests, vec!["Art", "Food"]);
                assert_eq!(budget, 200.0);
                assert_eq!(user, "local");
                assert_eq!(format, OutputFormat::Text);
            }
            _ => panic!("expected plan command"),
        }
    }

    #[test]
    fn test_parse_plan_requires_interest() {
        let result = Cli::try_parse_from(["tp", "plan", "Rome", "2025-06-01", "-b", "200"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_plan_rejects_bad_date() {
        let result =
            Cli::try_parse_from(["tp", "plan", "Rome", "June 1st", "-i", "Art", "-b", "200"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_chat_with_user() {
        let cli = Cli::parse_from(["tp", "chat", "-u", "amira"]);

        match cli.command {
            Command::Chat { user } => assert_eq!(user, "amira"),
            _ => panic!("expected chat command"),
        }
    }

    #[test]
    fn test_parse_trips_json() {
        let cli = Cli::parse_from(["tp", "trips", "-u", "amira", "-f", "json"]);

        match cli.command {
            Command::Trips { user, format } => {
                assert_eq!(user, "amira");
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected trips command"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["tp", "-c", "/tmp/tp.yml", "chat"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/tp.yml")));
    }

    #[test]
    fn test_global_log_level_flag() {
        let cli = Cli::parse_from(["tp", "-l", "DEBUG", "chat"]);
        assert_eq!(cli.log_level.as_deref(), Some("DEBUG"));
    }
}
