//! TripPlanner - Day Trip Orchestrator
//!
//! CLI entry point for planning trips, chatting with the planner, and
//! listing stored trips.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use tripplanner::cli::{Cli, Command, OutputFormat};
use tripplanner::config::Config;
use tripplanner::domain::TripRequest;
use tripplanner::facade::OrchestrationFacade;
use tripplanner::providers::Providers;
use tripplanner::repl::{ChatSession, render_record};
use tripstore::{InMemoryStore, Neo4jStore, TripStore};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripplanner")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level_str = cli_log_level.or(config_log_level);
    let level = if let Some(s) = level_str {
        match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        }
    } else {
        tracing::Level::INFO
    };

    let log_file = fs::File::create(log_dir.join("tripplanner.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "TripPlanner loaded config: model={}, origin={}",
        config.providers.itinerary.model, config.planning.default_origin
    );

    // Dispatch command
    match cli.command {
        Command::Plan {
            city,
            date,
            interests,
            budget,
            user,
            format,
        } => {
            debug!(%city, %date, ?interests, budget, %user, ?format, "main: matched Plan command");
            cmd_plan(&config, city, date, interests, budget, &user, format).await
        }
        Command::Chat { user } => {
            debug!(%user, "main: matched Chat command");
            cmd_chat(&config, &user).await
        }
        Command::Trips { user, format } => {
            debug!(%user, ?format, "main: matched Trips command");
            cmd_trips(&config, &user, format).await
        }
    }
}

/// Build the orchestration facade from config
async fn build_facade(config: &Config) -> Result<OrchestrationFacade> {
    config.validate()?;

    let providers = Providers::from_config(&config.providers)
        .map_err(|e| eyre::eyre!("Failed to create provider clients: {}", e))?;
    debug!("build_facade: provider clients created");

    let store = connect_store(config).await;

    Ok(OrchestrationFacade::new(providers, store, config))
}

/// Connect to the graph store, falling back to in-memory when unreachable
///
/// Planning degrades per section, so an unreachable store should not block
/// a plan either. Trips just stay local to this run.
async fn connect_store(config: &Config) -> Arc<dyn TripStore> {
    match Neo4jStore::connect(&config.store.to_store_config()).await {
        Ok(store) => {
            info!(uri = %config.store.uri, "Connected to graph store");
            Arc::new(store)
        }
        Err(e) => {
            warn!(error = %e, "Graph store unreachable, keeping trips in memory for this run");
            Arc::new(InMemoryStore::new())
        }
    }
}

/// Plan a one-day trip and print the resulting record
async fn cmd_plan(
    config: &Config,
    city: String,
    date: NaiveDate,
    interests: Vec<String>,
    budget: f64,
    user: &str,
    format: OutputFormat,
) -> Result<()> {
    debug!("cmd_plan: called");
    let facade = build_facade(config).await?;

    let request = TripRequest::new(city, date, interests, budget);
    let planned = facade.plan_trip(user, request).await?;
    debug!(trip_id = %planned.record.trip_id, "cmd_plan: trip assembled");

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(planned.record.as_ref())?);
        }
        OutputFormat::Text => {
            print!("{}", render_record(&planned.record));
        }
    }

    if let Err(e) = &planned.store_status {
        warn!(error = %e, "cmd_plan: trip fact not persisted");
        eprintln!("{} trip fact not stored: {}", "Warning:".yellow(), e);
    }

    Ok(())
}

/// Launch the interactive chat
async fn cmd_chat(config: &Config, user: &str) -> Result<()> {
    debug!("cmd_chat: called");
    let facade = build_facade(config).await?;

    let session = ChatSession::new(&facade, user);
    session.run().await
}

/// List stored trips for a user
async fn cmd_trips(config: &Config, user: &str, format: OutputFormat) -> Result<()> {
    debug!("cmd_trips: called");

    // Listing only reads the store, so skip provider key validation. A read
    // against an unreachable store is an error, not a silent empty list.
    let store = Neo4jStore::connect(&config.store.to_store_config())
        .await
        .map_err(|e| eyre::eyre!("Failed to connect to graph store: {}", e))?;

    let trips = store
        .trips_for_user(user)
        .await
        .map_err(|e| eyre::eyre!("Failed to list trips: {}", e))?;
    debug!(count = trips.len(), "cmd_trips: trips fetched");

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&trips)?);
        }
        OutputFormat::Text => {
            if trips.is_empty() {
                println!("No stored trips for '{}'", user);
                return Ok(());
            }

            println!("Trips for {}", user);
            println!("---------------");
            for fact in &trips {
                println!(
                    "{} {} (budget {} USD) {}",
                    fact.date,
                    fact.city.cyan(),
                    fact.budget,
                    format!("[{}]", fact.trip_id).dimmed()
                );
            }
        }
    }

    Ok(())
}
